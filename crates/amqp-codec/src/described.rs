//! Described constructor: a descriptor value followed by a body value.

use amqp_buffers::ChunkedCursor;

use crate::error::Halt;
use crate::handler::{Budget, ValueHandler};
use crate::value::Described;
use crate::AmqpValue;

/// Decodes the descriptor and body that follow a `0x00` code. Neither is
/// interpreted; any value may serve as a descriptor.
pub(crate) fn described(
    handler: &ValueHandler<'_>,
    cursor: &mut ChunkedCursor,
    depth: usize,
    budget: &mut Budget,
) -> Result<AmqpValue, Halt> {
    let descriptor = handler.read_value(cursor, depth + 1, budget)?;
    let body = handler.read_value(cursor, depth + 1, budget)?;
    Ok(AmqpValue::Described(Box::new(Described { descriptor, body })))
}
