//! Concurrency tests: racing desks and racing check-ins.

use std::collections::HashSet;

use super::*;

#[tokio::test]
async fn test_racing_desks_never_call_the_same_patient() {
    let qc = setup();

    for i in 0..20 {
        qc.check_in(walk_in(&format!("patient-{i}"))).await.unwrap();
    }

    let mut handles = Vec::new();
    for desk in 0..8 {
        let qc = Arc::clone(&qc);
        handles.push(tokio::spawn(async move {
            let mut called = Vec::new();
            loop {
                match qc.call_next(&format!("Desk{desk}"), None).await {
                    Ok(Some(entry)) => {
                        // Resolve immediately so the desk can call again.
                        qc.mark_no_show(entry.id).await.unwrap();
                        called.push(entry.id);
                    }
                    Ok(None) => break,
                    Err(e) => panic!("unexpected error: {e}"),
                }
            }
            called
        }));
    }

    let mut seen = HashSet::new();
    for handle in handles {
        for id in handle.await.unwrap() {
            assert!(seen.insert(id), "entry {id} called by two desks");
        }
    }
    assert_eq!(seen.len(), 20);
}

#[tokio::test]
async fn test_racing_call_specific_single_winner() {
    let qc = setup();
    let entry = qc.check_in(walk_in("Contested Patient")).await.unwrap();

    let mut handles = Vec::new();
    for desk in 0..4 {
        let qc = Arc::clone(&qc);
        let id = entry.id;
        handles.push(tokio::spawn(async move {
            qc.call_specific(id, &format!("Desk{desk}")).await
        }));
    }

    let mut winners = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(called) => {
                assert_eq!(called.status, EntryStatus::Called);
                winners += 1;
            }
            Err(QueueError::StaleState { .. }) => {}
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
    assert_eq!(winners, 1);

    // Losing desks must have rolled back their bindings.
    for desk in 0..4 {
        let point = format!("Desk{desk}");
        let winner = qc.lookup(entry.id).await.unwrap();
        if winner.service_point.as_deref() != Some(point.as_str()) {
            let other = qc.check_in(walk_in(&format!("filler-{desk}"))).await.unwrap();
            qc.call_specific(other.id, &point).await.unwrap();
        }
    }
}

#[tokio::test]
async fn test_concurrent_check_ins_get_unique_display_numbers() {
    let qc = setup();

    let mut handles = Vec::new();
    for i in 0..50 {
        let qc = Arc::clone(&qc);
        handles.push(tokio::spawn(async move {
            qc.check_in(walk_in(&format!("patient-{i}"))).await.unwrap()
        }));
    }

    let mut numbers = HashSet::new();
    for handle in handles {
        let entry = handle.await.unwrap();
        assert!(
            numbers.insert(entry.display_number),
            "display number {} allocated twice",
            entry.display_number
        );
    }
    assert_eq!(numbers.len(), 50);
}

#[tokio::test]
async fn test_racing_duplicate_check_ins_single_winner() {
    let qc = setup();

    let mut handles = Vec::new();
    for i in 0..8 {
        let qc = Arc::clone(&qc);
        handles.push(tokio::spawn(async move {
            let mut input = walk_in(&format!("claimant-{i}"));
            input.appointment_ref = Some("appt-race".to_string());
            qc.check_in(input).await
        }));
    }

    let mut winners = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => winners += 1,
            Err(QueueError::DuplicateCheckIn(_)) => {}
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
    assert_eq!(winners, 1);
}

#[tokio::test]
async fn test_desk_claimed_by_waiting_holder_stays_busy() {
    let qc = setup();

    let first = qc.check_in(walk_in("First Claimant")).await.unwrap();
    let second = qc.check_in(walk_in("Second Claimant")).await.unwrap();

    // Claim the desk for the first entry while it is still WAITING, the
    // window between a desk's binding claim and its call transition landing.
    qc.store.claim_service_point("Desk1", first.id).unwrap();

    let err = qc.store.claim_service_point("Desk1", second.id).unwrap_err();
    assert!(matches!(err, QueueError::ServicePointBusy(_)));

    let err = qc.call_specific(second.id, "Desk1").await.unwrap_err();
    assert!(matches!(err, QueueError::ServicePointBusy(_)));

    // If the first call loses its transition it rolls the binding back, and
    // only then does the desk open up again.
    qc.store.release_service_point("Desk1", first.id);
    let called = qc.call_specific(second.id, "Desk1").await.unwrap();
    assert_eq!(called.id, second.id);
    assert_eq!(called.service_point.as_deref(), Some("Desk1"));
}

#[tokio::test]
async fn test_in_flight_check_in_blocks_duplicate_ref() {
    let qc = setup();

    // A reference claimed by an entry not yet in the store is a check-in
    // still in flight; a concurrent claimant must be rejected, not treated
    // as holding a stale reference.
    let in_flight = Uuid::new_v4();
    let today = Utc::now().date_naive();
    qc.store
        .claim_appointment_ref("appt-9", in_flight, today)
        .unwrap();

    let mut input = walk_in("Late Claimant");
    input.appointment_ref = Some("appt-9".to_string());
    let err = qc.check_in(input).await.unwrap_err();
    assert!(matches!(err, QueueError::DuplicateCheckIn(_)));
}

#[tokio::test]
async fn test_racing_attending_and_no_show_single_winner() {
    let qc = setup();
    let entry = qc.check_in(walk_in("Racing Patient")).await.unwrap();
    qc.call_next("Desk1", None).await.unwrap().unwrap();

    let a = {
        let qc = Arc::clone(&qc);
        let id = entry.id;
        tokio::spawn(async move { qc.mark_attending(id).await })
    };
    let b = {
        let qc = Arc::clone(&qc);
        let id = entry.id;
        tokio::spawn(async move { qc.mark_no_show(id).await })
    };

    let results = [a.await.unwrap(), b.await.unwrap()];
    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);
    for result in &results {
        if let Err(e) = result {
            assert!(matches!(e, QueueError::StaleState { .. }));
        }
    }

    let settled = qc.lookup(entry.id).await.unwrap();
    assert!(matches!(
        settled.status,
        EntryStatus::Attending | EntryStatus::NoShow
    ));
}
