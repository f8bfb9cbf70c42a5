mod support;

use async_std::channel;
use async_std::task;
use media_picker::services::PermissionCoordinator;
use media_picker::state::EventBus;
use media_picker::{
    ItemPress, Lifecycle, LoadingStatus, MultiSelectPhase, PermissionStatus, PickerConfig,
    PickerEvent, ViewCoordinator,
};
use std::sync::Arc;
use std::time::Duration;
use support::{Host, MockLibrary, ScriptedPermission, ids, item};

struct Fixture {
    library: Arc<MockLibrary>,
    permission: Arc<ScriptedPermission>,
    host: Arc<Host>,
    picker: ViewCoordinator,
}

fn library() -> Arc<MockLibrary> {
    let library = MockLibrary::new();
    library.add_album("recents", &["a", "b", "c", "d"]);
    library.add_album("trip", &["c", "d"]);
    library
}

fn fixture_with(
    library: Arc<MockLibrary>,
    permission: Arc<ScriptedPermission>,
    config: PickerConfig,
) -> Fixture {
    let host = Host::new();
    let picker = ViewCoordinator::new(
        config,
        library.clone(),
        permission.clone(),
        host.clone(),
        Some(host.completion()),
    );
    Fixture {
        library,
        permission,
        host,
        picker,
    }
}

fn fixture(status: PermissionStatus, config: PickerConfig) -> Fixture {
    fixture_with(library(), ScriptedPermission::new(status), config)
}

fn config(max_selection: usize, prior: &[&str]) -> PickerConfig {
    PickerConfig::new(max_selection)
        .unwrap()
        .with_selected_asset_ids(prior.iter().copied())
}

#[test]
fn mount_loads_albums_restores_selection_and_subscribes() {
    let f = fixture(PermissionStatus::Authorized, config(3, &["c", "unknown", "a"]));
    task::block_on(f.picker.mount());

    assert_eq!(f.picker.lifecycle(), Lifecycle::Mounted);
    assert_eq!(f.picker.albums().len(), 2);
    assert_eq!(f.picker.selected_album().unwrap().id, "recents");
    assert_eq!(f.picker.loading_status(), LoadingStatus::Complete);
    assert_eq!(ids(&f.picker.selected_items()), ["c", "a"]);
    assert!(f.picker.is_subscribed_to_changes());
    assert_eq!(f.library.subscriber_count(), 1);
}

#[test]
fn restore_drops_items_that_no_longer_exist() {
    let f = fixture(PermissionStatus::Authorized, config(5, &["a", "b", "c"]));
    f.library.mark_missing("b");
    task::block_on(f.picker.mount());

    assert_eq!(ids(&f.picker.selected_items()), ["a", "c"]);
}

#[test]
fn restore_collapses_duplicates_and_caps_at_max() {
    let f = fixture(PermissionStatus::Authorized, config(2, &["d", "d", "a", "b"]));
    task::block_on(f.picker.mount());

    assert_eq!(ids(&f.picker.selected_items()), ["d", "a"]);
}

#[test]
fn prior_selection_starts_in_multi_select() {
    let f = fixture(PermissionStatus::Authorized, config(3, &["a", "b"]));
    assert_eq!(f.picker.multi_select_phase(), MultiSelectPhase::Active);

    let f = fixture(PermissionStatus::Authorized, config(3, &[]));
    assert_eq!(f.picker.multi_select_phase(), MultiSelectPhase::Inactive);
}

#[test]
fn leaving_multi_select_clears_after_the_transition() {
    let f = fixture(PermissionStatus::Authorized, config(3, &["a", "b"]));
    task::block_on(f.picker.mount());

    assert!(f.picker.deactivate_multi_select());
    assert_eq!(f.picker.multi_select_phase(), MultiSelectPhase::Deactivating);
    assert_eq!(f.picker.selected_items().len(), 2);

    f.picker.advance_transitions(Duration::from_millis(100));
    assert_eq!(f.picker.selected_items().len(), 2);

    f.picker.finish_transitions();
    assert_eq!(f.picker.multi_select_phase(), MultiSelectPhase::Inactive);
    assert!(f.picker.selected_items().is_empty());
}

#[test]
fn reentering_multi_select_mid_exit_keeps_selection() {
    let f = fixture(PermissionStatus::Authorized, config(3, &["a"]));
    task::block_on(f.picker.mount());

    f.picker.deactivate_multi_select();
    f.picker.advance_transitions(Duration::from_millis(100));
    f.picker.activate_multi_select();
    f.picker.finish_transitions();

    assert_eq!(f.picker.multi_select_phase(), MultiSelectPhase::Active);
    assert_eq!(ids(&f.picker.selected_items()), ["a"]);
}

#[test]
fn limited_access_shows_banner_until_authorized() {
    let f = fixture(PermissionStatus::Limited, config(3, &[]));
    task::block_on(f.picker.mount());
    f.picker.finish_transitions();

    let view = f.picker.view();
    assert_eq!(view.permission, PermissionStatus::Limited);
    assert!(view.limited_banner.visible);
    assert!(!view.blocked_banner.visible);
    assert_eq!(view.albums.len(), 2);

    task::block_on(f.picker.permission_changed(PermissionStatus::Authorized));
    f.picker.finish_transitions();

    let view = f.picker.view();
    assert!(!view.limited_banner.visible);
    assert!(!view.blocked_banner.visible);
    assert_eq!(f.permission.calls(), 1);
}

#[test]
fn denied_access_shows_blocked_banner_and_loads_nothing() {
    let f = fixture(PermissionStatus::Denied, config(3, &["a"]));
    task::block_on(f.picker.mount());
    f.picker.finish_transitions();

    let view = f.picker.view();
    assert!(view.blocked_banner.visible);
    assert!(!view.limited_banner.visible);
    assert!(view.grid.is_empty());
    assert_eq!(view.loading, LoadingStatus::Indeterminate);
    assert_eq!(f.library.list_calls(), 0);
    assert!(!f.picker.is_subscribed_to_changes());
    assert!(f.picker.selected_items().is_empty());
}

#[test]
fn access_granted_later_triggers_the_initial_load_once() {
    let f = fixture(PermissionStatus::Denied, config(3, &["a"]));
    task::block_on(f.picker.mount());

    task::block_on(f.picker.permission_changed(PermissionStatus::Authorized));
    assert_eq!(f.library.list_calls(), 1);
    assert_eq!(ids(&f.picker.selected_items()), ["a"]);
    assert!(f.picker.is_subscribed_to_changes());

    task::block_on(f.picker.permission_changed(PermissionStatus::Denied));
    assert!(!f.picker.is_subscribed_to_changes());
    assert_eq!(f.library.subscriber_count(), 0);

    task::block_on(f.picker.permission_changed(PermissionStatus::Limited));
    assert!(f.picker.is_subscribed_to_changes());
    assert_eq!(f.library.list_calls(), 1);
    assert_eq!(f.permission.calls(), 1);
}

#[test]
fn library_change_reloads_albums() {
    let f = fixture(PermissionStatus::Authorized, config(3, &[]));
    task::block_on(f.picker.mount());

    let (published, on_published) = channel::unbounded();
    f.picker.subscribe(move |event| {
        if matches!(event, PickerEvent::AlbumsPublished { .. }) {
            let _ = published.try_send(());
        }
    });

    f.library.add_album("party", &["e"]);
    f.library.fire_change();

    let reloaded = task::block_on(async_std::future::timeout(
        Duration::from_secs(5),
        on_published.recv(),
    ));
    assert!(matches!(reloaded, Ok(Ok(()))));
    assert_eq!(f.picker.albums().len(), 3);
}

#[test]
fn unmount_releases_the_subscription() {
    let f = fixture(PermissionStatus::Authorized, config(3, &[]));
    task::block_on(f.picker.mount());
    assert_eq!(f.library.subscriber_count(), 1);

    f.picker.unmount();
    f.picker.unmount();

    assert_eq!(f.picker.lifecycle(), Lifecycle::TornDown);
    assert_eq!(f.library.subscriber_count(), 0);
    assert!(!f.picker.is_subscribed_to_changes());

    let calls = f.library.list_calls();
    f.library.fire_change();
    task::block_on(f.picker.album_repository().reload());
    assert_eq!(f.library.list_calls(), calls);
}

#[test]
fn teardown_during_permission_request_never_subscribes() {
    let (open_gate, gate) = channel::bounded(1);
    let f = fixture_with(
        library(),
        ScriptedPermission::gated(PermissionStatus::Authorized, gate),
        config(3, &["a"]),
    );

    task::block_on(async {
        futures::join!(f.picker.mount(), async {
            f.picker.unmount();
            open_gate.send(()).await.unwrap();
        });
    });

    assert_eq!(f.library.list_calls(), 0);
    assert_eq!(f.library.subscriber_count(), 0);
    assert!(f.picker.selected_items().is_empty());
}

#[test]
fn teardown_during_load_discards_results() {
    let library = library();
    let (open_gate, gate) = channel::bounded(1);
    library.script_listing(&["recents", "trip"], Some(gate));
    let f = fixture_with(
        library,
        ScriptedPermission::new(PermissionStatus::Authorized),
        config(3, &[]),
    );

    task::block_on(async {
        futures::join!(f.picker.mount(), async {
            f.picker.unmount();
            open_gate.send(()).await.unwrap();
        });
    });

    assert!(f.picker.albums().is_empty());
    assert_eq!(f.library.subscriber_count(), 0);
}

#[test]
fn exit_completes_then_pops_exactly_once() {
    let f = fixture(PermissionStatus::Authorized, config(3, &["b", "a"]));
    task::block_on(f.picker.mount());

    assert!(f.picker.exit());
    assert!(!f.picker.exit());
    f.picker.unmount();

    assert_eq!(f.host.log(), ["complete", "pop"]);
    assert_eq!(
        f.host.delivered_ids().unwrap(),
        ["b".to_string(), "a".to_string()]
    );
    assert_eq!(f.picker.lifecycle(), Lifecycle::TornDown);
    assert_eq!(f.library.subscriber_count(), 0);
}

#[test]
fn exit_without_callback_still_pops() {
    let host = Host::new();
    let picker = ViewCoordinator::new(
        config(3, &[]),
        library(),
        ScriptedPermission::new(PermissionStatus::Authorized),
        host.clone(),
        None,
    );
    task::block_on(picker.mount());

    assert!(picker.exit());
    assert_eq!(host.log(), ["pop"]);
}

#[test]
fn failed_permission_request_counts_as_denied() {
    let f = fixture_with(library(), ScriptedPermission::failing(), config(3, &["a"]));
    task::block_on(f.picker.mount());
    f.picker.finish_transitions();

    assert_eq!(f.picker.permission_status(), PermissionStatus::Denied);
    let view = f.picker.view();
    assert!(view.blocked_banner.visible);
    assert!(!view.limited_banner.visible);
    assert_eq!(f.library.list_calls(), 0);
    assert!(!f.picker.is_subscribed_to_changes());
    assert_eq!(f.permission.calls(), 1);
}

#[test]
fn failed_permission_request_is_not_retried() {
    let provider = ScriptedPermission::failing();
    let permission =
        PermissionCoordinator::new(provider.clone(), Duration::from_millis(300), EventBus::new());

    assert_eq!(task::block_on(permission.request_access()), PermissionStatus::Denied);
    assert_eq!(task::block_on(permission.request_access()), PermissionStatus::Denied);
    assert_eq!(provider.calls(), 1);
    assert!(!permission.has_access());
}

#[test]
fn failed_change_subscription_keeps_albums_and_retries() {
    let f = fixture(PermissionStatus::Authorized, config(3, &[]));
    f.library.refuse_subscriptions(true);
    task::block_on(f.picker.mount());

    assert_eq!(f.picker.albums().len(), 2);
    assert_eq!(f.picker.loading_status(), LoadingStatus::Complete);
    assert!(!f.picker.is_subscribed_to_changes());
    assert_eq!(f.library.subscriber_count(), 0);

    f.library.refuse_subscriptions(false);
    task::block_on(f.picker.permission_changed(PermissionStatus::Authorized));
    assert!(f.picker.is_subscribed_to_changes());
    assert_eq!(f.library.subscriber_count(), 1);
    assert_eq!(f.library.list_calls(), 1);
}

#[test]
fn tap_while_leaving_multi_select_is_ignored() {
    let f = fixture(PermissionStatus::Authorized, config(3, &["a", "b"]));
    task::block_on(f.picker.mount());

    f.picker.deactivate_multi_select();
    assert_eq!(f.picker.press_item(item("c")), ItemPress::Ignored);
    assert_eq!(f.picker.lifecycle(), Lifecycle::Mounted);
    assert_eq!(ids(&f.picker.selected_items()), ["a", "b"]);
    assert!(f.host.log().is_empty());

    f.picker.finish_transitions();
    assert_eq!(f.picker.press_item(item("c")), ItemPress::Completed);
    assert_eq!(f.host.delivered_ids().unwrap(), ["c".to_string()]);
}

#[test]
fn tap_outside_multi_select_picks_the_item() {
    let f = fixture(PermissionStatus::Authorized, config(3, &[]));
    task::block_on(f.picker.mount());

    assert_eq!(f.picker.press_item(item("b")), ItemPress::Completed);
    assert_eq!(f.host.delivered_ids().unwrap(), ["b".to_string()]);
    assert_eq!(f.picker.lifecycle(), Lifecycle::Exited);
    assert_eq!(f.picker.press_item(item("c")), ItemPress::Ignored);
}

#[test]
fn multi_select_respects_max_selection() {
    let f = fixture(PermissionStatus::Authorized, config(2, &[]));
    task::block_on(f.picker.mount());

    assert!(f.picker.long_press_item(item("a")));
    assert_eq!(f.picker.multi_select_phase(), MultiSelectPhase::Activating);
    assert_eq!(
        f.picker.press_item(item("b")),
        ItemPress::Toggled { accepted: true }
    );
    assert_eq!(
        f.picker.press_item(item("c")),
        ItemPress::Toggled { accepted: false }
    );

    let view = f.picker.view();
    assert_eq!(view.toolbar.selected_count, 2);
    assert_eq!(view.toolbar.max_selection, 2);
    let selectable: Vec<bool> = view.grid.iter().map(|cell| cell.selectable).collect();
    assert_eq!(selectable, [true, true, false, false]);
    assert_eq!(view.grid[1].selection_index, Some(2));

    assert_eq!(
        f.picker.press_item(item("a")),
        ItemPress::Toggled { accepted: true }
    );
    assert_eq!(ids(&f.picker.selected_items()), ["b"]);
}

#[test]
fn album_switch_changes_the_grid() {
    let f = fixture(PermissionStatus::Authorized, config(3, &[]));
    task::block_on(f.picker.mount());

    assert!(f.picker.select_album("trip"));
    let view = f.picker.view();
    assert_eq!(view.toolbar.title.as_deref(), Some("trip"));
    assert_eq!(
        view.grid
            .iter()
            .map(|cell| cell.item.id.as_str())
            .collect::<Vec<_>>(),
        ["c", "d"]
    );
}
