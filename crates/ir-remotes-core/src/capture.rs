//! Bounded polling capture of IR control codes.

use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::command::IrCommand;
use crate::error::CaptureError;
use crate::transport::{Blaster, CODE_CLASS_IR};

/// Fixed backoff between capture polls.
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Drive one capture request against an authenticated appliance handle.
///
/// Arms learning mode, then polls until the appliance reports a code,
/// sleeping [`POLL_INTERVAL`] between attempts and counting elapsed
/// wall-clock time against `budget`. Exactly one code is returned on
/// success; no polling continues afterwards.
///
/// Failure modes, none retried: a refused arm request and any poll error
/// are protocol failures; a code of a non-infra-red class (a radio
/// capture) is a protocol failure carrying the observed class; an
/// exhausted budget is a timeout.
pub async fn capture_ir_code(
    blaster: &dyn Blaster,
    budget: Duration,
) -> Result<IrCommand, CaptureError> {
    blaster
        .start_capture()
        .await
        .map_err(CaptureError::CaptureMode)?;
    debug!(?budget, "capture mode armed, waiting for IR code");

    let start = Instant::now();
    while start.elapsed() < budget {
        match blaster.poll_captured().await {
            Ok(Some(code)) => {
                if code.code_class != CODE_CLASS_IR {
                    return Err(CaptureError::WrongCodeClass {
                        observed: code.code_class,
                        expected: CODE_CLASS_IR,
                    });
                }
                return Ok(IrCommand::new(code.data));
            }
            Ok(None) => tokio::time::sleep(POLL_INTERVAL).await,
            Err(e) => return Err(CaptureError::Poll(e)),
        }
    }

    Err(CaptureError::TimedOut(budget))
}
