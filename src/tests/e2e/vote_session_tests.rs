use crate::modules::votes::core::entry::VoteSnapshot;
use crate::modules::votes::session::VoteSession;
use crate::modules::votes::views::vote_binding::VoteBinding;
use crate::shared::core::counting::CountingModel;
use crate::shared::core::primitives::{Direction, ItemId, UserId, Vote};
use crate::tests::fixtures::backend::seeded_backend;
use crate::tests::fixtures::commands::toggle_vote::ToggleVoteBuilder;
use std::sync::Arc;
use std::time::Duration;

const ITEM: &str = "comment-0001";
const VIEWER: &str = "user-fixed-0001";

#[tokio::test]
async fn logout_forgets_every_cached_direction() {
    let backend = Arc::new(seeded_backend(CountingModel::Signed, ITEM, 1, 0).await);
    let first = VoteSession::start(backend.clone(), CountingModel::Signed);
    let viewer = UserId::new(VIEWER);
    first
        .controller()
        .ensure_hydrated(&ItemId::new(ITEM), Some(&viewer))
        .await
        .unwrap();
    first
        .controller()
        .toggle(ToggleVoteBuilder::new().build())
        .await
        .unwrap();

    first.end();
    let second = VoteSession::start(backend, CountingModel::Signed);
    let hydrated = second
        .controller()
        .ensure_hydrated(&ItemId::new(ITEM), None)
        .await
        .unwrap();

    assert_eq!(hydrated, Some(VoteSnapshot::new(2, Direction::None)));
}

#[tokio::test]
async fn a_resolution_landing_after_logout_is_discarded() {
    let backend = seeded_backend(CountingModel::Signed, ITEM, 0, 0).await;
    backend.set_delay_ms(20);
    let session = VoteSession::start(Arc::new(backend), CountingModel::Signed);
    let controller = session.controller().clone();
    let store = session.store().clone();
    controller.hydrate(ItemId::new(ITEM), 0, Direction::None);

    let pending = tokio::spawn({
        let controller = controller.clone();
        async move { controller.toggle(ToggleVoteBuilder::new().build()).await }
    });
    tokio::time::sleep(Duration::from_millis(5)).await;
    session.end();
    let resolved = pending.await.unwrap();

    assert_eq!(resolved, Ok(VoteSnapshot::new(1, Direction::Up)));
    assert!(store.is_empty());
    assert!(!controller.is_pending(&ItemId::new(ITEM)));
}

#[tokio::test]
async fn unmounting_a_view_does_not_cancel_its_pending_vote() {
    let backend = seeded_backend(CountingModel::Signed, ITEM, 2, 0).await;
    backend.set_delay_ms(20);
    let session = VoteSession::start(Arc::new(backend), CountingModel::Signed);
    session.controller().hydrate(ItemId::new(ITEM), 2, Direction::None);
    let binding = VoteBinding::mount(session.controller().clone(), ItemId::new(ITEM));

    let clicked = tokio::time::timeout(
        Duration::from_millis(1),
        binding.click(Vote::Up, Some(UserId::new(VIEWER))),
    )
    .await;
    assert!(clicked.is_err());
    binding.unmount();

    tokio::time::sleep(Duration::from_millis(40)).await;

    let entry = session.store().get(&ItemId::new(ITEM)).unwrap();
    assert_eq!(entry.snapshot(), VoteSnapshot::new(3, Direction::Up));
    assert!(!session.controller().is_pending(&ItemId::new(ITEM)));
    let record = session
        .controller()
        .gateway()
        .record(&ItemId::new(ITEM), &UserId::new(VIEWER))
        .await;
    assert_eq!(record.map(|r| r.direction), Some(Direction::Up));
}

#[tokio::test]
async fn deleting_an_item_purges_its_entry_and_its_records() {
    let backend = seeded_backend(CountingModel::Signed, ITEM, 3, 1).await;
    let session = VoteSession::start(Arc::new(backend), CountingModel::Signed);
    let item_id = ItemId::new(ITEM);
    session
        .controller()
        .ensure_hydrated(&item_id, None)
        .await
        .unwrap();

    assert!(session.controller().gateway().delete_item(&item_id).await);
    session.item_deleted(&item_id);

    assert_eq!(session.store().get(&item_id), None);
    assert!(session.controller().gateway().records_for(&item_id).await.is_empty());
    let toggled = session
        .controller()
        .toggle(ToggleVoteBuilder::new().build())
        .await;
    assert!(toggled.is_err());
}
