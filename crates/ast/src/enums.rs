use std::fmt;
use strum::{AsRefStr, Display, EnumIs, EnumString};

/// The memory region a variable lives in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, AsRefStr, Display, EnumIs, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum AddressSpace {
    Function,
    Private,
    Workgroup,
    Uniform,
    Storage,
    /// Texture and sampler bindings. Never written in source; inferred.
    Handle,
}

/// Memory access mode, as written in `var<storage, read_write>` or `ptr`
/// templates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, AsRefStr, Display, EnumIs, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum AccessMode {
    Read,
    Write,
    ReadWrite,
}

/// A shader pipeline stage, as declared by an entry-point attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, AsRefStr, Display, EnumIs, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum ShaderStage {
    Vertex,
    Fragment,
    Compute,
}

/// Number of components in a vector type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VecSize {
    Two,
    Three,
    Four,
}

impl VecSize {
    /// Creates a `VecSize` from a component count.
    pub fn from_u8(n: u8) -> Option<Self> {
        match n {
            2 => Some(Self::Two),
            3 => Some(Self::Three),
            4 => Some(Self::Four),
            _ => None,
        }
    }

    /// Returns the component count.
    #[inline]
    pub const fn to_u32(self) -> u32 {
        match self {
            Self::Two => 2,
            Self::Three => 3,
            Self::Four => 4,
        }
    }
}

impl fmt::Display for VecSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_u32())
    }
}
