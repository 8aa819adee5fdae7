use crate::reference::Ref;
use crate::utils::{pairing3, MyHash};

/// An internal decision node: `variable ? high : low`.
///
/// Terminal cells carry variable 0. The `high` edge of a stored node is never
/// complemented, which keeps the representation canonical.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Node {
    pub variable: u32,
    pub low: Ref,
    pub high: Ref,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            variable: 0,
            low: Ref::positive(0),
            high: Ref::positive(0),
        }
    }
}

impl MyHash for Node {
    fn hash(&self) -> u64 {
        pairing3(
            self.variable as u64,
            self.low.unsigned() as u64,
            self.high.unsigned() as u64,
        )
    }
}
