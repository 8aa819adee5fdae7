use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU32, Ordering};

use crate::reference::Ref;

/// Identity of a [`Bdd`][crate::bdd::Bdd] manager.
///
/// Node handles are only meaningful inside the manager that created them;
/// canonicity does not hold across managers.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ManagerId(u32);

impl ManagerId {
    pub(crate) fn fresh() -> Self {
        static NEXT: AtomicU32 = AtomicU32::new(0);
        ManagerId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl Display for ManagerId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A boolean function: a node handle tagged with the manager it belongs to.
///
/// Obtained from [`Bdd::function`][crate::bdd::Bdd::function]. Copying is free and
/// equality is handle equality.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Function {
    manager: ManagerId,
    node: Ref,
}

impl Function {
    pub(crate) fn new(manager: ManagerId, node: Ref) -> Self {
        Self { manager, node }
    }

    pub fn manager(&self) -> ManagerId {
        self.manager
    }

    pub fn node(&self) -> Ref {
        self.node
    }
}
