use std::time::Duration;

use shared::domain::LocationId;
use tokio::sync::Semaphore;

use super::*;
use crate::{
    detail::DetailStatus,
    directory::DisplayMode,
    test_support::{company, location, transport_error, ScriptedDataAccess},
};

fn two_companies() -> ScriptedDataAccess {
    ScriptedDataAccess::new()
        .with_companies(Ok(vec![company(1, "Acme Corp"), company(2, "Other")]))
        .with_company(1, Ok(company(1, "Acme Corp")))
        .with_locations(
            1,
            Ok(vec![
                location(10, 1, "warehouse", 10.0, 20.0),
                location(11, 1, "factory", 12.0, 18.0),
            ]),
        )
        .with_company(2, Ok(company(2, "Other")))
        .with_locations(2, Ok(vec![location(20, 2, "office", 40.0, 40.0)]))
}

#[tokio::test]
async fn directory_route_loads_once() {
    let data = Arc::new(two_companies());
    let mut session = Session::new(data.clone());

    session.navigate(Route::Directory);
    session.settle().await;
    session.navigate(Route::Directory);
    session.settle().await;

    assert!(session.directory().is_loaded());
    assert_eq!(session.directory().companies().len(), 2);
    assert_eq!(data.calls(), vec!["companies".to_string()]);

    session.directory_mut().set_mode(DisplayMode::Search);
    session.directory_mut().search("acme");
    assert_eq!(session.directory().filtered_companies().len(), 1);
}

#[tokio::test]
async fn failed_directory_is_retried_on_next_visit() {
    let data = Arc::new(ScriptedDataAccess::new().with_companies(Err(transport_error())));
    let mut session = Session::new(data.clone());

    session.navigate(Route::Directory);
    session.settle().await;
    assert!(session.directory().load_error().is_some());

    session.navigate(Route::Directory);
    session.settle().await;
    assert_eq!(data.calls().len(), 2);
}

#[tokio::test]
async fn detail_route_loads_company_and_locations() {
    let mut session = Session::new(Arc::new(two_companies()));

    session.navigate(Route::CompanyDetail(CompanyId(1)));
    assert_eq!(session.in_flight(), 2);
    session.settle().await;

    assert_eq!(session.in_flight(), 0);
    assert_eq!(session.route(), Route::CompanyDetail(CompanyId(1)));
    let detail = session.detail();
    assert_eq!(detail.status(), DetailStatus::Ready);
    assert_eq!(detail.locations().len(), 2);
    assert_eq!(detail.bounds().map(|b| b.min_longitude), Some(18.0));
}

#[tokio::test]
async fn superseded_detail_results_are_ignored() {
    let gate = Arc::new(Semaphore::new(0));
    let data = Arc::new(two_companies().gated(1, gate.clone()));
    let mut session = Session::new(data);

    session.navigate(Route::CompanyDetail(CompanyId(1)));
    session.navigate(Route::CompanyDetail(CompanyId(2)));
    assert_eq!(session.in_flight(), 4);

    // Only company 2's fetches can complete while company 1 is gated.
    assert!(session.process_next().await);
    assert!(session.process_next().await);
    assert_eq!(session.detail().status(), DetailStatus::Ready);

    gate.add_permits(2);
    tokio::time::timeout(Duration::from_secs(5), session.settle())
        .await
        .expect("stale fetches complete");

    let detail = session.detail();
    assert_eq!(detail.company().map(|c| c.company_id), Some(CompanyId(2)));
    let ids: Vec<LocationId> = detail.locations().iter().map(|l| l.location_id).collect();
    assert_eq!(ids, vec![LocationId(20)]);
    assert!(!detail.has_error());
}

#[tokio::test]
async fn one_failed_half_fails_detail() {
    let data = two_companies().with_locations(2, Err(transport_error()));
    let mut session = Session::new(Arc::new(data));

    session.navigate(Route::CompanyDetail(CompanyId(2)));
    session.settle().await;

    assert_eq!(session.detail().status(), DetailStatus::Failed);
    assert!(session.detail().company().is_none());
}

#[tokio::test]
async fn panicking_fetch_fails_detail_instead_of_hanging() {
    let data = two_companies().panicking(1);
    let mut session = Session::new(Arc::new(data));

    session.navigate(Route::CompanyDetail(CompanyId(1)));
    tokio::time::timeout(Duration::from_secs(5), session.settle())
        .await
        .expect("settle returns after a panicked fetch");

    assert_eq!(session.in_flight(), 0);
    assert_eq!(session.detail().status(), DetailStatus::Failed);
    assert!(matches!(
        session.detail().error(),
        Some(FetchError::Transport(_))
    ));
}

#[tokio::test]
async fn panicking_stale_fetch_does_not_fail_newer_load() {
    let data = two_companies().panicking(1);
    let mut session = Session::new(Arc::new(data));

    session.navigate(Route::CompanyDetail(CompanyId(1)));
    session.navigate(Route::CompanyDetail(CompanyId(2)));
    tokio::time::timeout(Duration::from_secs(5), session.settle())
        .await
        .expect("settle");

    assert_eq!(session.in_flight(), 0);
    assert_eq!(session.detail().status(), DetailStatus::Ready);
    assert_eq!(
        session.detail().company().map(|c| c.company_id),
        Some(CompanyId(2))
    );
}

#[tokio::test]
async fn process_next_without_pending_work_returns_false() {
    let mut session = Session::new(Arc::new(ScriptedDataAccess::new()));
    assert!(!session.process_next().await);
}
