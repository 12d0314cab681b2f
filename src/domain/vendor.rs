use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VendorId(pub String);

impl VendorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for VendorId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VendorStatus {
    Active,
    /// Terminal: reached once the outstanding balance is fully written off.
    WrittenOff,
}

impl VendorStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::WrittenOff => "written_off",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Some(Self::Active),
            "written_off" | "written off" | "writtenoff" => Some(Self::WrittenOff),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Vendor {
    pub id: VendorId,
    pub name: String,
    pub outstanding: Decimal, // amount still eligible for write-off
    pub status: Option<VendorStatus>,
}

impl Vendor {
    pub fn new(id: impl Into<String>, name: impl Into<String>, outstanding: Decimal) -> Self {
        Self {
            id: VendorId::new(id),
            name: name.into(),
            outstanding,
            status: None,
        }
    }

    /// Applies a patch in place. The caller decides whether the decrement is
    /// admissible; this only does the arithmetic.
    pub fn apply(&mut self, patch: &VendorPatch) {
        self.outstanding -= patch.decrement;
        if let Some(status) = patch.status {
            self.status = Some(status);
        }
    }
}

/// Partial vendor update: a relative decrement on the outstanding balance
/// and an optional status change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VendorPatch {
    pub decrement: Decimal,
    pub status: Option<VendorStatus>,
}
