use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use proptest::prelude::*;
use vitrine_core::{paginate, Item, ItemPage};
use vitrine_test_utils::fixtures::{numbered_items, sample_items};
use vitrine_tui::api_client::{ApiClientError, ItemsQuery, RefreshResponse, StatsReading};
use vitrine_tui::config::{ThemeConfig, TuiConfig};
use vitrine_tui::keys::{map_key, Action, InputMode};
use vitrine_tui::notifications::NotificationLevel;
use vitrine_tui::state::{App, Request, View};
use vitrine_core::calculate_stats;

fn base_config() -> TuiConfig {
    TuiConfig {
        api_base_url: "http://localhost:3001".to_string(),
        request_timeout_ms: 5_000,
        page_size: 10,
        theme: ThemeConfig {
            name: "synthbrute".to_string(),
        },
    }
}

fn page_of(items: &[Item], limit: u64, page: u64) -> ItemPage {
    let refs: Vec<&Item> = items.iter().collect();
    paginate(&refs, limit, page).unwrap()
}

fn not_found() -> ApiClientError {
    ApiClientError::Server {
        status: 404,
        code: "ITEM_NOT_FOUND".to_string(),
        message: "Item not found".to_string(),
    }
}

fn loaded_app(items: &[Item]) -> App {
    let mut app = App::new(base_config());
    app.initial_request();
    app.on_items_loaded(Ok(page_of(items, 10, 1)));
    app
}

#[test]
fn config_rejects_bad_values() {
    let mut config = base_config();
    config.page_size = 0;
    assert!(config.validate().is_err());

    let mut config = base_config();
    config.api_base_url = "localhost:3001".to_string();
    assert!(config.validate().is_err());

    let mut config = base_config();
    config.theme.name = "unknown".to_string();
    assert!(config.validate().is_err());

    assert!(base_config().validate().is_ok());
}

#[test]
fn initial_request_loads_first_page() {
    let mut app = App::new(base_config());
    assert_eq!(
        app.initial_request(),
        Request::LoadItems(ItemsQuery {
            page: 1,
            limit: 10,
            q: None
        })
    );
    assert!(app.items_view.loading);
}

#[test]
fn search_submit_resets_to_first_page() {
    let mut app = loaded_app(&numbered_items(25));
    assert!(app.handle_action(Action::NextPage).is_some());
    app.on_items_loaded(Ok(page_of(&numbered_items(25), 10, 2)));
    assert_eq!(app.items_view.current_page, 2);

    app.handle_action(Action::OpenSearch);
    assert_eq!(app.input_mode, InputMode::Search);
    for c in "odd".chars() {
        app.handle_action(Action::SearchInput(c));
    }
    let request = app.handle_action(Action::SubmitSearch);
    assert_eq!(
        request,
        Some(Request::LoadItems(ItemsQuery {
            page: 1,
            limit: 10,
            q: Some("odd".to_string())
        }))
    );
    assert_eq!(app.input_mode, InputMode::Normal);
}

#[test]
fn cancel_search_keeps_previous_term() {
    let mut app = loaded_app(&sample_items());
    app.handle_action(Action::OpenSearch);
    app.handle_action(Action::SearchInput('x'));
    assert_eq!(app.handle_action(Action::CancelSearch), None);
    assert_eq!(app.items_view.search_term, "");
    assert_eq!(app.items_view.search_input, "");
}

#[test]
fn clear_search_only_when_searching() {
    let mut app = loaded_app(&sample_items());
    assert_eq!(app.handle_action(Action::ClearSearch), None);

    app.items_view.search_term = "desk".to_string();
    let request = app.handle_action(Action::ClearSearch);
    assert!(matches!(request, Some(Request::LoadItems(ItemsQuery { q: None, page: 1, .. }))));
}

#[test]
fn results_line_and_footer() {
    let items = numbered_items(25);
    let mut app = loaded_app(&items);
    assert_eq!(app.items_view.results_line(), None);
    assert_eq!(
        app.items_view.pagination_footer().as_deref(),
        Some("Page 1 of 3 (25 total items)")
    );

    app.items_view.search_term = "odd".to_string();
    app.on_items_loaded(Ok(page_of(&items[..13], 10, 1)));
    assert_eq!(
        app.items_view.results_line().as_deref(),
        Some("Showing results for \"odd\" - 13 items found")
    );
}

#[test]
fn single_page_has_no_footer_and_no_paging() {
    let mut app = loaded_app(&sample_items());
    assert_eq!(app.items_view.pagination_footer(), None);
    assert_eq!(app.handle_action(Action::NextPage), None);
    assert_eq!(app.handle_action(Action::PrevPage), None);
}

#[test]
fn open_detail_and_back() {
    let mut app = loaded_app(&sample_items());
    app.handle_action(Action::MoveDown);
    assert_eq!(app.handle_action(Action::Open), Some(Request::LoadItem(2)));
    assert_eq!(app.active_view, View::Detail);

    app.on_item_loaded(Ok(sample_items()[1].clone()));
    assert_eq!(
        app.detail_view.breadcrumb(),
        "Items › Noise Cancelling Headphones"
    );

    app.handle_action(Action::Back);
    assert_eq!(app.active_view, View::Items);
}

#[test]
fn failed_detail_returns_to_list_with_error() {
    let mut app = loaded_app(&sample_items());
    app.handle_action(Action::Open);
    app.on_item_loaded(Err(not_found()));

    assert_eq!(app.active_view, View::Items);
    let note = app.notifications.last().unwrap();
    assert_eq!(note.level, NotificationLevel::Error);
    assert_eq!(note.message, "Item not found");
}

#[test]
fn stats_view_tracks_cache_status_and_refresh() {
    let mut app = loaded_app(&sample_items());
    assert_eq!(app.handle_action(Action::ShowStats), Some(Request::LoadStats));

    let summary = calculate_stats(&sample_items());
    app.on_stats_loaded(Ok(StatsReading {
        summary: summary.clone(),
        cache_status: Some("HIT".to_string()),
    }));
    assert_eq!(app.stats_view.cache_status.as_deref(), Some("HIT"));

    assert_eq!(app.handle_action(Action::Refresh), Some(Request::RefreshStats));
    app.on_stats_refreshed(Ok(RefreshResponse {
        message: "Cache refreshed".to_string(),
        stats: summary.clone(),
    }));
    assert_eq!(app.stats_view.summary, Some(summary));
    assert_eq!(app.notifications.last().map(|n| n.message.as_str()), Some("Cache refreshed"));
}

#[test]
fn failed_list_clears_items() {
    let mut app = loaded_app(&sample_items());
    app.on_items_loaded(Err(ApiClientError::InvalidResponse("HTTP 500".to_string())));
    assert!(app.items_view.items.is_empty());
    assert!(app.items_view.pagination.is_none());
    assert_eq!(app.items_view.selected, None);
}

proptest! {
    #[test]
    fn selection_stays_in_bounds(moves in proptest::collection::vec(any::<bool>(), 0..40), count in 1usize..15) {
        let mut app = loaded_app(&numbered_items(count));
        for down in moves {
            app.handle_action(if down { Action::MoveDown } else { Action::MoveUp });
        }
        let selected = app.items_view.selected.unwrap();
        prop_assert!(selected < app.items_view.items.len());
    }

    #[test]
    fn search_mode_routes_every_char_to_input(c in proptest::char::range('a', 'z')) {
        let event = KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE);
        prop_assert_eq!(map_key(event, InputMode::Search), Some(Action::SearchInput(c)));
    }
}
