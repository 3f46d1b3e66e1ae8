/// Direction of a register transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Register bytes read from the chip into the mirror.
    Read,
    /// Mirror bytes written to the chip.
    Write,
}

/// Observer notified after every completed bus transaction.
///
/// The driver records each transaction's direction, start register and payload,
/// giving the host observability without compile-time branching. The default
/// sink is [`NoTrace`], which discards everything.
pub trait BusTrace {
    /// Record a completed transaction.
    ///
    /// `bytes` holds the payload only, without the leading address byte.
    fn record(&mut self, access: Access, start_addr: u8, bytes: &[u8]);
}

/// Trace sink that discards every record.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTrace;

impl BusTrace for NoTrace {
    fn record(&mut self, _access: Access, _start_addr: u8, _bytes: &[u8]) {}
}
