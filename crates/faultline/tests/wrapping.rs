//! End-to-end wrapping behavior through the public API only.

use faultline::{Fault, ResultExt, catch, fault};
use pretty_assertions::assert_eq;

#[derive(Debug, thiserror::Error, PartialEq)]
#[error("invalid argument")]
struct InvalidArgument;

fn do_another_stuff(b: i64) -> faultline::Result<()> {
    if b <= 0 {
        return Err(InvalidArgument).with_context(|| format!("doAnotherStuff(b={b})"));
    }
    Ok(())
}

fn do_stuff(a: &str, b: i64) -> faultline::Result<()> {
    do_another_stuff(b).with_context(|| format!("doStuff(a={a}, b={b})"))
}

#[test]
fn context_reads_as_a_call_stack_of_invocations() {
    let err = do_stuff("World", -1).unwrap_err();
    assert_eq!(
        err.message(),
        "doStuff(a=World, b=-1): doAnotherStuff(b=-1): invalid argument"
    );
    // The sentinel is still reachable through every layer.
    assert!(err.is::<InvalidArgument>());
}

#[test]
fn success_path_stays_success() {
    assert!(do_stuff("World", 1).is_ok());
}

#[test]
fn slot_based_catch_reads_the_same() {
    fn do_another_stuff(b: i64) -> faultline::Result<()> {
        let mut err = if b <= 0 {
            Some(Fault::wrap(InvalidArgument))
        } else {
            None
        };
        catch!(err, "doAnotherStuff(b={b})");
        err.map_or(Ok(()), Err)
    }

    fn do_stuff(a: &str, b: i64) -> faultline::Result<()> {
        let mut err = do_another_stuff(b).err();
        catch!(err, "doStuff(a={a}, b={b})");
        err.map_or(Ok(()), Err)
    }

    let err = do_stuff("World", -1).unwrap_err();
    assert_eq!(
        err.message(),
        "doStuff(a=World, b=-1): doAnotherStuff(b=-1): invalid argument"
    );
    assert!(do_stuff("World", 3).is_ok());
}

#[test]
fn catch_function_skips_empty_slots() {
    let mut slot: Option<Fault> = None;
    catch(&mut slot, || panic!("must not run"));
    assert!(slot.is_none());
}

#[test]
fn wrapping_depth_does_not_leak_into_the_message() {
    let mut err = fault!("disk {} offline", 3);
    for stage in ["checkpoint", "flush", "shutdown"] {
        err = Fault::context(err, stage);
    }
    assert_eq!(err.message(), "shutdown: flush: checkpoint: disk 3 offline");
    assert!(!err.message().contains(".rs:"));
}

#[test]
fn trace_is_message_plus_resolved_frames() {
    let err = do_stuff("World", -1).unwrap_err();
    let trace = err.trace();
    let frames = err.frames();

    assert!(trace.starts_with(&err.message()));
    assert_eq!(trace.lines().count(), 1 + frames.len());
    for (line, frame) in trace.lines().skip(1).zip(frames) {
        assert_eq!(line, format!("    {frame}"));
    }
}

#[test]
fn foreign_wrapper_between_faults_keeps_one_capture() {
    #[derive(Debug, thiserror::Error)]
    #[error("double wrapping: {0}")]
    struct Outer(#[source] Fault);

    let err = Fault::wrap(Outer(fault!("something")));
    assert_eq!(err.message(), "double wrapping: something");

    // Identical traces on repeated renders: one capture, one cache.
    assert_eq!(err.trace(), err.trace());
}

#[test]
fn wrap_up_attributes_to_the_callers_caller() {
    fn helper(raw: &str) -> faultline::Result<u16> {
        // Library-style helper annotating on behalf of its caller.
        raw.parse::<u16>().fault_up()
    }

    let err = helper("not-a-port").unwrap_err();
    assert_eq!(err.message(), "invalid digit found in string");
    assert!(err.is::<std::num::ParseIntError>());
}
