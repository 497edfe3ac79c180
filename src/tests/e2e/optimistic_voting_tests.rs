use crate::modules::votes::cache::vote_store::Subscription;
use crate::modules::votes::core::entry::VoteSnapshot;
use crate::modules::votes::session::VoteSession;
use crate::modules::votes::use_cases::toggle_vote::handler::{ToggleError, ToggleErrorKind};
use crate::modules::votes::views::vote_binding::VoteBinding;
use crate::shared::core::counting::CountingModel;
use crate::shared::core::primitives::{Direction, ItemId, UserId, Vote};
use crate::shared::infrastructure::persistence_gateway::GatewayError;
use crate::shared::infrastructure::persistence_gateway::in_memory::InMemoryVoteRecords;
use crate::tests::fixtures::backend::seeded_backend;
use crate::tests::fixtures::commands::toggle_vote::ToggleVoteBuilder;
use crate::tests::fixtures::held_gateway::HeldGateway;
use std::sync::{Arc, Mutex};

const ITEM: &str = "comment-0001";
const VIEWER: &str = "user-fixed-0001";

fn record_snapshots(
    session: &VoteSession<InMemoryVoteRecords>,
) -> (Arc<Mutex<Vec<VoteSnapshot>>>, Subscription) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let subscription = session
        .store()
        .subscribe(ItemId::new(ITEM), move |snapshot| {
            sink.lock().unwrap().push(*snapshot)
        });
    (seen, subscription)
}

#[tokio::test]
async fn toggling_the_same_direction_twice_withdraws_the_vote() {
    let backend = seeded_backend(CountingModel::Signed, ITEM, 5, 0).await;
    let session = VoteSession::start(Arc::new(backend), CountingModel::Signed);
    let controller = session.controller();
    let viewer = UserId::new(VIEWER);

    let hydrated = controller
        .ensure_hydrated(&ItemId::new(ITEM), Some(&viewer))
        .await
        .unwrap();
    assert_eq!(hydrated, Some(VoteSnapshot::new(5, Direction::None)));

    let first = controller.toggle(ToggleVoteBuilder::new().build()).await;
    assert_eq!(first, Ok(VoteSnapshot::new(6, Direction::Up)));

    let second = controller.toggle(ToggleVoteBuilder::new().build()).await;
    assert_eq!(second, Ok(VoteSnapshot::new(5, Direction::None)));
    assert_eq!(controller.gateway().record(&ItemId::new(ITEM), &viewer).await, None);
}

#[tokio::test]
async fn a_rapid_second_click_is_rejected_and_never_reaches_the_store() {
    let backend = seeded_backend(CountingModel::Signed, ITEM, 0, 0).await;
    backend.set_delay_ms(20);
    let session = VoteSession::start(Arc::new(backend), CountingModel::Signed);
    let controller = session.controller();
    controller.hydrate(ItemId::new(ITEM), 0, Direction::None);

    let (first, second) = tokio::join!(
        controller.toggle(ToggleVoteBuilder::new().build()),
        controller.toggle(ToggleVoteBuilder::new().build())
    );

    assert_eq!(first, Ok(VoteSnapshot::new(1, Direction::Up)));
    assert_eq!(second, Err(ToggleError::Busy(ItemId::new(ITEM))));
    assert_eq!(controller.gateway().set_vote_calls(), 1);
    assert_eq!(controller.gateway().tally(&ItemId::new(ITEM)).await, 1);
}

#[tokio::test]
async fn a_failed_switch_restores_the_exact_previous_snapshot() {
    let backend = seeded_backend(CountingModel::Signed, ITEM, 0, 0).await;
    let session = VoteSession::start(Arc::new(backend), CountingModel::Signed);
    let controller = session.controller();
    controller.hydrate(ItemId::new(ITEM), 10, Direction::Down);
    let (seen, _subscription) = record_snapshots(&session);
    controller
        .gateway()
        .fail_next(GatewayError::NetworkFailure("connection reset".into()));

    let error = controller
        .toggle(ToggleVoteBuilder::new().up().build())
        .await
        .unwrap_err();

    assert_eq!(error.kind(), ToggleErrorKind::NetworkFailure);
    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            VoteSnapshot::new(12, Direction::Up),
            VoteSnapshot::new(10, Direction::Down)
        ]
    );
    assert!(!controller.is_pending(&ItemId::new(ITEM)));
}

#[tokio::test]
async fn every_view_of_an_item_renders_the_same_state() {
    let backend = seeded_backend(CountingModel::Signed, ITEM, 2, 1).await;
    backend.set_delay_ms(10);
    let gateway = Arc::new(HeldGateway::new(backend));
    let session = VoteSession::start(gateway.clone(), CountingModel::Signed);
    let viewer = UserId::new(VIEWER);
    let item_id = ItemId::new(ITEM);
    let list_card = VoteBinding::mount(session.controller().clone(), item_id.clone());
    let detail_page = VoteBinding::mount(session.controller().clone(), item_id.clone());

    let (from_list, from_detail) = tokio::join!(
        session.controller().ensure_hydrated(list_card.item_id(), Some(&viewer)),
        session.controller().ensure_hydrated(detail_page.item_id(), Some(&viewer))
    );
    assert_eq!(from_list.unwrap(), from_detail.unwrap());
    assert_eq!(gateway.backend().fetch_calls(), 1);

    let (clicked, observed) = tokio::join!(list_card.click(Vote::Down, Some(viewer.clone())), async {
        while !session.controller().is_pending(&item_id) {
            tokio::task::yield_now().await;
        }
        let observed = (list_card.rendered(), detail_page.rendered(), detail_page.is_disabled());
        gateway.release_writes(1);
        observed
    });

    let optimistic = Some(VoteSnapshot::new(0, Direction::Down));
    assert_eq!(observed, (optimistic, optimistic, true));
    assert_eq!(clicked, Ok(VoteSnapshot::new(0, Direction::Down)));
    assert_eq!(list_card.rendered(), detail_page.rendered());
    assert!(!detail_page.is_disabled());
}

#[tokio::test]
async fn the_authoritative_count_replaces_a_drifted_optimistic_one() {
    let backend = seeded_backend(CountingModel::Signed, ITEM, 6, 0).await;
    let session = VoteSession::start(Arc::new(backend), CountingModel::Signed);
    let controller = session.controller();
    controller.hydrate(ItemId::new(ITEM), 7, Direction::None);
    let (seen, _subscription) = record_snapshots(&session);

    let result = controller.toggle(ToggleVoteBuilder::new().build()).await;

    assert_eq!(result, Ok(VoteSnapshot::new(7, Direction::Up)));
    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            VoteSnapshot::new(8, Direction::Up),
            VoteSnapshot::new(7, Direction::Up)
        ]
    );
}

#[tokio::test]
async fn an_anonymous_click_changes_nothing() {
    let backend = seeded_backend(CountingModel::Signed, ITEM, 3, 0).await;
    let session = VoteSession::start(Arc::new(backend), CountingModel::Signed);
    let controller = session.controller();
    let before = controller.hydrate(ItemId::new(ITEM), 3, Direction::None);
    let (seen, _subscription) = record_snapshots(&session);
    let calls_before = controller.gateway().set_vote_calls();

    let result = controller
        .toggle(ToggleVoteBuilder::new().anonymous().build())
        .await;

    assert_eq!(result, Err(ToggleError::Unauthenticated));
    assert_eq!(controller.store().get(&ItemId::new(ITEM)).unwrap().snapshot(), before);
    assert_eq!(controller.store().get(&ItemId::new(ITEM)).unwrap().version, 1);
    assert!(seen.lock().unwrap().is_empty());
    assert_eq!(controller.gateway().set_vote_calls(), calls_before);
    assert!(!controller.is_pending(&ItemId::new(ITEM)));
}

#[tokio::test]
async fn post_cards_count_only_up_votes() {
    let backend = seeded_backend(CountingModel::Single, "post-0001", 4, 0).await;
    let session = VoteSession::start(Arc::new(backend), CountingModel::Signed);
    let posts = session.controller_for(CountingModel::Single);
    let viewer = UserId::new(VIEWER);

    let hydrated = posts
        .ensure_hydrated(&ItemId::new("post-0001"), Some(&viewer))
        .await
        .unwrap();
    assert_eq!(hydrated, Some(VoteSnapshot::new(4, Direction::None)));

    let up = posts
        .toggle(ToggleVoteBuilder::new().item_id("post-0001").build())
        .await;
    assert_eq!(up, Ok(VoteSnapshot::new(5, Direction::Up)));

    let down = posts
        .toggle(ToggleVoteBuilder::new().item_id("post-0001").down().build())
        .await;
    assert_eq!(down.unwrap_err().kind(), ToggleErrorKind::UnsupportedDirection);
}
