pub(crate) mod ids;
pub(crate) mod program;

use std::{
    cell::Cell,
    fmt,
    rc::Rc,
    sync::Arc,
    time::{Duration, Instant},
};

use tracing::{debug, info, warn};
use warden_vm::core::{
    clock::MonotonicClock,
    constants::DEFAULT_TIMING_THRESHOLD,
    integrity::Violation,
    types::Word,
    vm::{ExecutionResult, VM},
};

use crate::{error::Error, interfaces::AuthArgs};
use ids::CallIds;
use program::build_auth_program;

/// The default mask deriving the failure id from the success id.
pub const DEFAULT_FAILURE_ID_MASK: Word = 0x5A5A5A5A;

/// The outcome of an authentication run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The success callback fired and the run stayed clean.
    Granted,

    /// The key was rejected, or the run stopped before reaching either callback.
    Denied,

    /// The integrity latch was set during the run.
    Tampered(Violation),
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Granted => write!(f, "authentication successful"),
            Verdict::Denied => write!(f, "authentication failed"),
            Verdict::Tampered(violation) => write!(f, "security alert: {violation}"),
        }
    }
}

/// Everything the `auth` command reports back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthReport {
    /// The verdict of the run
    pub verdict: Verdict,

    /// The raw result of the run
    pub result: ExecutionResult,

    /// The call ids the program reported through
    pub ids: CallIds,

    /// The key the program accepts
    pub accepted_key: Word,
}

/// Loads `words` into `vm`, registers recording callbacks for `ids`, and runs it.
///
/// A set integrity latch always wins over the callbacks, even if a callback already fired.
pub fn run_auth_program(vm: &mut VM, words: &[Word], ids: CallIds) -> (Verdict, ExecutionResult) {
    let outcome = Rc::new(Cell::new(None));

    let granted = outcome.clone();
    vm.register_external_call(ids.success, move || granted.set(Some(true)));
    let denied = outcome.clone();
    vm.register_external_call(ids.failure, move || denied.set(Some(false)));

    vm.load(words);
    let result = vm.run();

    let verdict = match (result.violation, outcome.get()) {
        (Some(violation), _) => Verdict::Tampered(violation),
        (None, Some(true)) => Verdict::Granted,
        (None, Some(false)) => Verdict::Denied,
        (None, None) => {
            warn!(halt = %result.halt, "run stopped before reaching a verdict");
            Verdict::Denied
        }
    };

    (verdict, result)
}

/// Builds the authentication program for `input` and runs it on `vm`.
pub fn authenticate(vm: &mut VM, input: Word, ids: CallIds) -> Result<Verdict, Error> {
    let program = build_auth_program(input, ids)?;
    Ok(run_auth_program(vm, &program.words, ids).0)
}

/// The `auth` command: builds a program for the supplied key with fresh call ids and runs it.
pub fn auth(args: AuthArgs) -> Result<AuthReport, Error> {
    let start_time = Instant::now();

    let key = args.key.ok_or(Error::MissingKey)?;
    let threshold =
        args.timing_threshold_ms.map(Duration::from_millis).unwrap_or(DEFAULT_TIMING_THRESHOLD);
    let mask = args.failure_id_mask.unwrap_or(DEFAULT_FAILURE_ID_MASK);

    let ids = CallIds::random(&mut rand::thread_rng(), mask)?;
    let program = build_auth_program(key, ids)?;
    debug!("building authentication program took {:?}", start_time.elapsed());

    let mut vm = VM::with_clock(Arc::new(MonotonicClock::new()), threshold)
        .with_step_limit(args.step_limit.unwrap_or_default());

    info!("running authentication logic...");
    let (verdict, result) = run_auth_program(&mut vm, &program.words, ids);
    debug!(steps = result.steps, halt = %result.halt, "authentication took {:?}", start_time.elapsed());

    Ok(AuthReport { verdict, result, ids, accepted_key: program.expected_key() })
}
