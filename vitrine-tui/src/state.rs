//! Application state and view state definitions.
//!
//! State changes are synchronous. Anything that needs the server is returned
//! as a [`Request`] for the event loop to run, and the result comes back
//! through one of the `on_*` methods.

use crate::api_client::{ApiClientError, ItemsQuery, RefreshResponse, StatsReading};
use crate::config::TuiConfig;
use crate::keys::{Action, InputMode};
use crate::notifications::{Notification, NotificationLevel};
use crate::theme::SynthBruteTheme;
use chrono::{DateTime, Utc};
use vitrine_core::{Item, ItemId, ItemPage, Pagination, StatsSummary};

const MAX_NOTIFICATIONS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Items,
    Detail,
    Stats,
}

impl View {
    pub fn title(&self) -> &'static str {
        match self {
            View::Items => "Items",
            View::Detail => "Item",
            View::Stats => "Stats",
        }
    }
}

/// Server work requested by a state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    LoadItems(ItemsQuery),
    LoadItem(ItemId),
    LoadStats,
    RefreshStats,
}

#[derive(Debug, Clone, Default)]
pub struct ItemsViewState {
    pub items: Vec<Item>,
    pub pagination: Option<Pagination>,
    pub current_page: u64,
    /// Search that produced the current results.
    pub search_term: String,
    /// Text in the search box while editing.
    pub search_input: String,
    pub selected: Option<usize>,
    pub loading: bool,
}

impl ItemsViewState {
    fn new() -> Self {
        Self {
            current_page: 1,
            ..Self::default()
        }
    }

    pub fn selected_item(&self) -> Option<&Item> {
        self.selected.and_then(|index| self.items.get(index))
    }

    pub fn has_next_page(&self) -> bool {
        self.pagination.as_ref().is_some_and(|p| p.has_next_page)
    }

    pub fn has_prev_page(&self) -> bool {
        self.pagination.as_ref().is_some_and(|p| p.has_prev_page)
    }

    /// `Showing results for "<q>" - N items found`, only while searching.
    pub fn results_line(&self) -> Option<String> {
        if self.search_term.is_empty() {
            return None;
        }
        let found = self.pagination.as_ref().map_or(0, |p| p.total_items);
        Some(format!(
            "Showing results for \"{}\" - {} items found",
            self.search_term, found
        ))
    }

    /// `Page X of Y (Z total items)`, only when there is more than one page.
    pub fn pagination_footer(&self) -> Option<String> {
        let pagination = self.pagination.as_ref()?;
        if pagination.total_pages <= 1 {
            return None;
        }
        Some(format!(
            "Page {} of {} ({} total items)",
            pagination.current_page, pagination.total_pages, pagination.total_items
        ))
    }
}

#[derive(Debug, Clone, Default)]
pub struct DetailViewState {
    pub item: Option<Item>,
    pub loading: bool,
}

impl DetailViewState {
    pub fn breadcrumb(&self) -> String {
        let name = self
            .item
            .as_ref()
            .map(|item| item.name.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or("Item Details");
        format!("Items › {}", name)
    }
}

#[derive(Debug, Clone, Default)]
pub struct StatsViewState {
    pub summary: Option<StatsSummary>,
    /// `X-Cache` value from the last stats read.
    pub cache_status: Option<String>,
    pub loaded_at: Option<DateTime<Utc>>,
    pub loading: bool,
}

#[derive(Debug, Clone)]
pub struct App {
    pub config: TuiConfig,
    pub theme: SynthBruteTheme,
    pub active_view: View,
    pub input_mode: InputMode,

    pub items_view: ItemsViewState,
    pub detail_view: DetailViewState,
    pub stats_view: StatsViewState,

    pub notifications: Vec<Notification>,
}

impl App {
    pub fn new(config: TuiConfig) -> Self {
        Self {
            config,
            theme: SynthBruteTheme::synthbrute(),
            active_view: View::Items,
            input_mode: InputMode::Normal,
            items_view: ItemsViewState::new(),
            detail_view: DetailViewState::default(),
            stats_view: StatsViewState::default(),
            notifications: Vec::new(),
        }
    }

    /// First load after startup.
    pub fn initial_request(&mut self) -> Request {
        self.load_items()
    }

    pub fn items_query(&self) -> ItemsQuery {
        let q = &self.items_view.search_term;
        ItemsQuery {
            page: self.items_view.current_page,
            limit: self.config.page_size,
            q: (!q.is_empty()).then(|| q.clone()),
        }
    }

    fn load_items(&mut self) -> Request {
        self.items_view.loading = true;
        Request::LoadItems(self.items_query())
    }

    pub fn notify(&mut self, level: NotificationLevel, message: impl Into<String>) {
        self.notifications.push(Notification::new(level, message));
        if self.notifications.len() > MAX_NOTIFICATIONS {
            let overflow = self.notifications.len() - MAX_NOTIFICATIONS;
            self.notifications.drain(..overflow);
        }
    }

    /// Apply a key action. Returns the server request it needs, if any.
    pub fn handle_action(&mut self, action: Action) -> Option<Request> {
        match action {
            Action::Quit => None,
            Action::MoveUp => {
                self.select_previous();
                None
            }
            Action::MoveDown => {
                self.select_next();
                None
            }
            Action::NextPage => {
                if self.active_view == View::Items && self.items_view.has_next_page() {
                    self.items_view.current_page += 1;
                    return Some(self.load_items());
                }
                None
            }
            Action::PrevPage => {
                if self.active_view == View::Items
                    && self.items_view.has_prev_page()
                    && self.items_view.current_page > 1
                {
                    self.items_view.current_page -= 1;
                    return Some(self.load_items());
                }
                None
            }
            Action::Open => {
                if self.active_view != View::Items {
                    return None;
                }
                let id = self.items_view.selected_item()?.id;
                self.active_view = View::Detail;
                self.detail_view = DetailViewState {
                    item: None,
                    loading: true,
                };
                Some(Request::LoadItem(id))
            }
            Action::Back => {
                if matches!(self.active_view, View::Detail | View::Stats) {
                    self.active_view = View::Items;
                }
                None
            }
            Action::OpenSearch => {
                if self.active_view == View::Items {
                    self.input_mode = InputMode::Search;
                    self.items_view.search_input = self.items_view.search_term.clone();
                }
                None
            }
            Action::SearchInput(c) => {
                self.items_view.search_input.push(c);
                None
            }
            Action::SearchBackspace => {
                self.items_view.search_input.pop();
                None
            }
            Action::SubmitSearch => {
                self.input_mode = InputMode::Normal;
                self.items_view.search_term = self.items_view.search_input.clone();
                self.items_view.current_page = 1;
                Some(self.load_items())
            }
            Action::CancelSearch => {
                self.input_mode = InputMode::Normal;
                self.items_view.search_input = self.items_view.search_term.clone();
                None
            }
            Action::ClearSearch => {
                if self.active_view != View::Items || self.items_view.search_term.is_empty() {
                    return None;
                }
                self.items_view.search_term.clear();
                self.items_view.search_input.clear();
                self.items_view.current_page = 1;
                Some(self.load_items())
            }
            Action::ShowItems => {
                self.active_view = View::Items;
                None
            }
            Action::ShowStats => {
                self.active_view = View::Stats;
                self.stats_view.loading = true;
                Some(Request::LoadStats)
            }
            Action::Refresh => match self.active_view {
                View::Items => Some(self.load_items()),
                View::Detail => self
                    .detail_view
                    .item
                    .as_ref()
                    .map(|item| Request::LoadItem(item.id)),
                View::Stats => {
                    self.stats_view.loading = true;
                    Some(Request::RefreshStats)
                }
            },
            Action::DismissNotification => {
                self.notifications.pop();
                None
            }
        }
    }

    fn select_next(&mut self) {
        if self.active_view != View::Items || self.items_view.items.is_empty() {
            return;
        }
        let last = self.items_view.items.len() - 1;
        self.items_view.selected = Some(match self.items_view.selected {
            Some(index) => (index + 1).min(last),
            None => 0,
        });
    }

    fn select_previous(&mut self) {
        if self.active_view != View::Items || self.items_view.items.is_empty() {
            return;
        }
        self.items_view.selected = Some(match self.items_view.selected {
            Some(index) => index.saturating_sub(1),
            None => 0,
        });
    }

    pub fn on_items_loaded(&mut self, result: Result<ItemPage, ApiClientError>) {
        self.items_view.loading = false;
        match result {
            Ok(page) => {
                self.items_view.selected = if page.items.is_empty() { None } else { Some(0) };
                self.items_view.items = page.items;
                self.items_view.pagination = Some(page.pagination);
            }
            Err(err) => {
                self.items_view.items.clear();
                self.items_view.pagination = None;
                self.items_view.selected = None;
                self.notify(NotificationLevel::Error, format!("Failed to fetch items: {}", err));
            }
        }
    }

    /// A failed lookup sends the user back to the list.
    pub fn on_item_loaded(&mut self, result: Result<Item, ApiClientError>) {
        self.detail_view.loading = false;
        match result {
            Ok(item) => self.detail_view.item = Some(item),
            Err(err) => {
                self.detail_view.item = None;
                if self.active_view == View::Detail {
                    self.active_view = View::Items;
                }
                let message = if err.is_not_found() {
                    "Item not found".to_string()
                } else {
                    format!("Failed to fetch item: {}", err)
                };
                self.notify(NotificationLevel::Error, message);
            }
        }
    }

    pub fn on_stats_loaded(&mut self, result: Result<StatsReading, ApiClientError>) {
        self.stats_view.loading = false;
        match result {
            Ok(reading) => {
                self.stats_view.summary = Some(reading.summary);
                self.stats_view.cache_status = reading.cache_status;
                self.stats_view.loaded_at = Some(Utc::now());
            }
            Err(err) => self.notify(NotificationLevel::Error, format!("Failed to fetch stats: {}", err)),
        }
    }

    pub fn on_stats_refreshed(&mut self, result: Result<RefreshResponse, ApiClientError>) {
        self.stats_view.loading = false;
        match result {
            Ok(response) => {
                self.stats_view.summary = Some(response.stats);
                self.stats_view.cache_status = None;
                self.stats_view.loaded_at = Some(Utc::now());
                self.notify(NotificationLevel::Success, response.message);
            }
            Err(err) => self.notify(NotificationLevel::Error, format!("Refresh failed: {}", err)),
        }
    }
}
