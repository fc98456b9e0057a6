//! Assertion macros for staking results

/// Asserts that a result is `Ok` and yields the value.
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(val) => val,
            Err(err) => panic!("expected Ok, got Err({:?})", err),
        }
    };
    ($expr:expr, $($arg:tt)+) => {
        match $expr {
            Ok(val) => val,
            Err(err) => panic!("expected Ok, got Err({:?}): {}", err, format!($($arg)+)),
        }
    };
}

/// Asserts that a result is `Err` and yields the error.
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match $expr {
            Ok(val) => panic!("expected Err, got Ok({:?})", val),
            Err(err) => err,
        }
    };
    ($expr:expr, $($arg:tt)+) => {
        match $expr {
            Ok(val) => panic!("expected Err, got Ok({:?}): {}", val, format!($($arg)+)),
            Err(err) => err,
        }
    };
}

/// Asserts that an operation failed and left the store byte-for-byte unchanged.
///
/// `$state` must be `Clone + PartialEq + Debug`; `$op` may borrow it mutably.
#[macro_export]
macro_rules! assert_err_unchanged {
    ($state:expr, $op:expr) => {{
        let before = $state.clone();
        let err = $crate::assert_err!($op);
        assert_eq!($state, before, "failed operation mutated state: {:?}", err);
        err
    }};
}
