//! Library init/exit through the stub driver

mod helpers;

use std::sync::Arc;

use hackrf::{initialize, shutdown, Error, HackRf};
use helpers::{Call, StubDriver};

#[test]
fn test_initialize_twice_is_not_guarded() {
    let stub = StubDriver::new();
    assert_eq!(initialize(&stub), Ok(()));
    assert_eq!(initialize(&stub), Ok(()));
    assert_eq!(stub.count(&Call::Init), 2);
}

#[test]
fn test_shutdown_twice_is_not_guarded() {
    let stub = StubDriver::new();
    assert_eq!(shutdown(&stub), Ok(()));
    assert_eq!(shutdown(&stub), Ok(()));
    assert_eq!(stub.count(&Call::Exit), 2);
}

#[test]
fn test_initialize_maps_failure() {
    let stub = StubDriver::new();
    stub.fail("init", -1000);
    assert_eq!(initialize(&stub), Err(Error::Libusb));

    stub.fail("init", -4321);
    assert_eq!(initialize(&stub), Err(Error::Unknown(-4321)));
}

#[test]
fn test_shutdown_maps_failure() {
    let stub = StubDriver::new();
    stub.fail("exit", -1001);
    assert_eq!(shutdown(&stub), Err(Error::Thread));
}

#[test]
fn test_guard_exits_on_drop() {
    let stub = Arc::new(StubDriver::new());
    {
        let _hackrf = HackRf::with_driver(stub.clone()).unwrap();
        assert_eq!(stub.calls(), vec![Call::Init]);
    }
    assert_eq!(stub.calls(), vec![Call::Init, Call::Exit]);
}

#[test]
fn test_explicit_exit_runs_once() {
    let stub = Arc::new(StubDriver::new());
    let hackrf = HackRf::with_driver(stub.clone()).unwrap();
    assert_eq!(hackrf.exit(), Ok(()));
    assert_eq!(stub.count(&Call::Exit), 1);
}

#[test]
fn test_explicit_exit_reports_failure() {
    let stub = Arc::new(StubDriver::new());
    stub.fail("exit", -9999);
    let hackrf = HackRf::with_driver(stub.clone()).unwrap();
    assert_eq!(hackrf.exit(), Err(Error::Other));
    assert_eq!(stub.count(&Call::Exit), 1);
}

#[test]
fn test_failed_init_gives_no_guard() {
    let stub = Arc::new(StubDriver::new());
    stub.fail("init", -11);
    let err = HackRf::with_driver(stub.clone()).unwrap_err();
    assert_eq!(err, Error::NoMem);
    assert_eq!(stub.count(&Call::Exit), 0);
}

#[test]
fn test_two_guards_each_exit() {
    let stub = Arc::new(StubDriver::new());
    let first = HackRf::with_driver(stub.clone()).unwrap();
    let second = HackRf::with_driver(stub.clone()).unwrap();
    drop(first);
    drop(second);
    assert_eq!(stub.count(&Call::Init), 2);
    assert_eq!(stub.count(&Call::Exit), 2);
}

#[test]
fn test_devices_close_before_exit() {
    let stub = Arc::new(StubDriver::new());
    {
        let hackrf = HackRf::with_driver(stub.clone()).unwrap();
        let _device = hackrf.open().unwrap();
    }
    assert_eq!(
        stub.calls(),
        vec![Call::Init, Call::Open(None), Call::Close, Call::Exit]
    );
}

#[test]
fn test_init_from_missing_library() {
    let err = HackRf::init_from("/nonexistent/libhackrf.so.0").unwrap_err();
    assert!(matches!(err, hackrf::InitError::Load(_)));
}
