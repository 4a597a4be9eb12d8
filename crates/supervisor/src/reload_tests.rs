use super::*;

#[test]
fn fire_with_no_subscribers_does_not_panic() {
    let hub = LiveReloadHub::new();
    hub.fire();
}

#[tokio::test]
async fn subscriber_observes_a_fire() {
    let hub = LiveReloadHub::new();
    let mut rx = hub.subscribe();
    hub.fire();
    rx.recv().await.expect("fire delivered");
}

#[tokio::test]
async fn each_subscriber_gets_its_own_copy() {
    let hub = LiveReloadHub::new();
    let mut a = hub.subscribe();
    let mut b = hub.subscribe();
    hub.fire();
    a.recv().await.expect("a sees it");
    b.recv().await.expect("b sees it");
}
