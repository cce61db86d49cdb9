//! Autocomplete handlers for Discord slash command parameters.
//!
//! Suggests existing client names and catalog service labels as the operator
//! types, so bookings reuse the exact names the store joins on.

use crate::{bot::BotData, core::client, errors::Error};

/// Discord caps autocomplete lists at 25 entries.
const MAX_SUGGESTIONS: usize = 25;

/// Provides autocomplete suggestions for client names.
///
/// Matches are case-insensitive substring matches against the client book,
/// returned in alphabetical order.
pub async fn autocomplete_client_name(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let db = &ctx.data().database;

    let Ok(clients) = client::list_clients(db).await else {
        return Vec::new();
    };

    filter_suggestions(clients.into_iter().map(|c| c.name), partial)
}

/// Provides autocomplete suggestions for service labels from the catalog.
pub async fn autocomplete_service(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    filter_suggestions(ctx.data().settings.service_labels(), partial)
}

fn filter_suggestions<I>(candidates: I, partial: &str) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let partial_lower = partial.to_lowercase();
    let mut matching: Vec<String> = candidates
        .into_iter()
        .filter(|name| name.to_lowercase().contains(&partial_lower))
        .take(MAX_SUGGESTIONS)
        .collect();
    matching.sort();
    matching
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_suggestions_case_insensitive() {
        let names = vec![
            "Bruna".to_string(),
            "Ana Paula".to_string(),
            "Mariana".to_string(),
        ];
        assert_eq!(
            filter_suggestions(names.clone(), "ana"),
            vec!["Ana Paula".to_string(), "Mariana".to_string()]
        );
        assert_eq!(filter_suggestions(names, "").len(), 3);
    }

    #[test]
    fn test_filter_suggestions_caps_length() {
        let names = (0..40).map(|i| format!("Client {i:02}"));
        assert_eq!(filter_suggestions(names, "client").len(), MAX_SUGGESTIONS);
    }
}
