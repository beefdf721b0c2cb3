use super::*;

#[test]
fn memory_broadcaster_records_in_order() {
    let mut b = MemoryBroadcaster::new();
    let log = b.log();
    b.emit("sizeData", 12.0);
    b.emit("pulseData", 40.0);
    let log = log.borrow();
    assert_eq!(log.len(), 2);
    assert_eq!(
        log[0],
        Emission {
            label: "sizeData".into(),
            value: 12.0
        }
    );
    assert_eq!(log[1].label, "pulseData");
}

#[test]
fn disconnected_emission_is_dropped_not_queued() {
    let mut b = MemoryBroadcaster::disconnected();
    let log = b.log();
    b.emit("sizeData", 50.0);
    assert!(log.borrow().is_empty());

    b.set_connected(true);
    assert!(log.borrow().is_empty());
    b.emit("sizeData", 51.0);
    assert_eq!(log.borrow().len(), 1);
    assert_eq!(log.borrow()[0].value, 51.0);
}

#[test]
fn null_broadcaster_is_never_connected() {
    let mut b = NullBroadcaster;
    b.emit("x", 1.0);
    assert!(!b.is_connected());
}
