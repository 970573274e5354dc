//! Launch parameters and deep-link resolution.
//!
//! A launch can ask for search, for a specific item, or for a user view
//! (library). Anything that does not parse is treated as "nothing requested".

use tracing::debug;
use uuid::Uuid;

use super::collaborators::ItemLookup;
use super::StartupError;
use crate::domain::{Destination, Item, ItemId, LibraryKind, Session};

/// Action tag of the incoming launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LaunchAction {
    View,
    Search,
    #[default]
    Main,
}

/// Raw launch parameters, as handed over by the host.
#[derive(Debug, Clone, Default)]
pub struct LaunchParams {
    pub action: LaunchAction,
    /// Opaque data reference (URI-like); only read for `View` launches.
    pub data: Option<String>,
    pub item_id: Option<String>,
    pub item_is_user_view: bool,
    pub hide_splash: bool,
}

/// What the launch asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchRequest {
    Search,
    ItemRequest { item_id: ItemId, is_user_view: bool },
    Default,
}

impl LaunchRequest {
    pub fn from_params(params: &LaunchParams) -> Self {
        if params.action == LaunchAction::Search {
            return LaunchRequest::Search;
        }

        let raw = match (params.action, params.data.as_deref()) {
            (LaunchAction::View, Some(data)) => Some(data),
            _ => params.item_id.as_deref(),
        };

        match raw.and_then(parse_item_id) {
            Some(item_id) => LaunchRequest::ItemRequest {
                item_id,
                is_user_view: params.item_is_user_view,
            },
            None => LaunchRequest::Default,
        }
    }
}

/// Accepts exactly the hyphenated or the 32-digit simple form: no padding,
/// braces or `urn:uuid:` prefix.
pub fn parse_item_id(raw: &str) -> Option<ItemId> {
    match raw.len() {
        32 | 36 => Uuid::parse_str(raw).ok(),
        _ => None,
    }
}

/// Map a user-view item to the library browser that shows it.
pub fn user_view_destination(item: Item) -> Destination {
    let kind = LibraryKind::from_collection_type(item.collection_type.as_deref());
    Destination::UserView { item, kind }
}

/// Turns a launch request into a destination, looking items up when needed.
pub struct DeepLinkResolver<'a> {
    items: &'a dyn ItemLookup,
}

impl<'a> DeepLinkResolver<'a> {
    pub fn new(items: &'a dyn ItemLookup) -> Self {
        Self { items }
    }

    pub async fn resolve(
        &self,
        request: &LaunchRequest,
        session: &Session,
    ) -> Result<Destination, StartupError> {
        let destination = match *request {
            LaunchRequest::Search => Destination::Search,
            LaunchRequest::ItemRequest {
                item_id,
                is_user_view: true,
            } => {
                debug!("Looking up user view item {}", item_id);
                let item = self
                    .items
                    .get_item(session, item_id)
                    .await
                    .map_err(|source| StartupError::ItemLookup {
                        id: item_id,
                        source,
                    })?;
                user_view_destination(item)
            }
            LaunchRequest::ItemRequest {
                item_id,
                is_user_view: false,
            } => Destination::ItemDetails(item_id),
            LaunchRequest::Default => Destination::Home,
        };

        Ok(destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const ITEM: &str = "0b7f8f46-2c1a-4b8e-9d3c-5e6f7a8b9c0d";

    struct CountingLookup {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingLookup {
        fn new(fail: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail,
            }
        }
    }

    #[async_trait]
    impl ItemLookup for CountingLookup {
        async fn get_item(&self, _session: &Session, id: ItemId) -> Result<Item> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                anyhow::bail!("item {} not found", id);
            }
            Ok(Item {
                id,
                name: "Shows".to_string(),
                item_type: Some("CollectionFolder".to_string()),
                collection_type: Some("tvshows".to_string()),
            })
        }
    }

    fn session() -> Session {
        Session {
            server_id: Uuid::new_v4(),
            server_address: "http://media.local:8096".to_string(),
            access_token: "token".to_string(),
        }
    }

    fn item_id() -> ItemId {
        Uuid::parse_str(ITEM).unwrap()
    }

    #[test]
    fn test_search_action_wins_over_item() {
        let params = LaunchParams {
            action: LaunchAction::Search,
            item_id: Some(ITEM.to_string()),
            ..Default::default()
        };
        assert_eq!(LaunchRequest::from_params(&params), LaunchRequest::Search);
    }

    #[test]
    fn test_view_action_reads_data_reference() {
        let params = LaunchParams {
            action: LaunchAction::View,
            data: Some(ITEM.to_string()),
            item_id: Some("not-a-uuid".to_string()),
            ..Default::default()
        };
        assert_eq!(
            LaunchRequest::from_params(&params),
            LaunchRequest::ItemRequest {
                item_id: item_id(),
                is_user_view: false
            }
        );
    }

    #[test]
    fn test_view_action_without_data_falls_back_to_item_field() {
        let params = LaunchParams {
            action: LaunchAction::View,
            item_id: Some(ITEM.replace('-', "")),
            item_is_user_view: true,
            ..Default::default()
        };
        assert_eq!(
            LaunchRequest::from_params(&params),
            LaunchRequest::ItemRequest {
                item_id: item_id(),
                is_user_view: true
            }
        );
    }

    #[test]
    fn test_malformed_or_missing_item_is_default() {
        let params = LaunchParams {
            item_id: Some("12345".to_string()),
            item_is_user_view: true,
            ..Default::default()
        };
        assert_eq!(LaunchRequest::from_params(&params), LaunchRequest::Default);
        assert_eq!(
            LaunchRequest::from_params(&LaunchParams::default()),
            LaunchRequest::Default
        );
    }

    #[test]
    fn test_item_id_must_be_bare_uuid() {
        assert_eq!(parse_item_id(ITEM), Some(item_id()));
        assert_eq!(parse_item_id(&ITEM.replace('-', "")), Some(item_id()));

        assert_eq!(parse_item_id(&format!(" {} ", ITEM)), None);
        assert_eq!(parse_item_id(&format!("{{{}}}", ITEM)), None);
        assert_eq!(parse_item_id(&format!("urn:uuid:{}", ITEM)), None);
        assert_eq!(parse_item_id("0b7f8f46-2c1a-4b8e-9d3c-5e6f7a8b9c0g"), None);
    }

    #[tokio::test]
    async fn test_resolve_mapping_table() {
        let lookup = CountingLookup::new(false);
        let resolver = DeepLinkResolver::new(&lookup);
        let session = session();

        let search = resolver
            .resolve(&LaunchRequest::Search, &session)
            .await
            .unwrap();
        assert_eq!(search, Destination::Search);

        let details = resolver
            .resolve(
                &LaunchRequest::ItemRequest {
                    item_id: item_id(),
                    is_user_view: false,
                },
                &session,
            )
            .await
            .unwrap();
        assert_eq!(details, Destination::ItemDetails(item_id()));

        let home = resolver
            .resolve(&LaunchRequest::Default, &session)
            .await
            .unwrap();
        assert_eq!(home, Destination::Home);

        // None of the above touch the network
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 0);

        let view = resolver
            .resolve(
                &LaunchRequest::ItemRequest {
                    item_id: item_id(),
                    is_user_view: true,
                },
                &session,
            )
            .await
            .unwrap();
        match view {
            Destination::UserView { item, kind } => {
                assert_eq!(item.id, item_id());
                assert_eq!(kind, LibraryKind::TvShows);
            }
            other => panic!("unexpected destination: {:?}", other),
        }
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_lookup_failure_propagates() {
        let lookup = CountingLookup::new(true);
        let resolver = DeepLinkResolver::new(&lookup);

        let err = resolver
            .resolve(
                &LaunchRequest::ItemRequest {
                    item_id: item_id(),
                    is_user_view: true,
                },
                &session(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, StartupError::ItemLookup { id, .. } if id == item_id()));
    }
}
