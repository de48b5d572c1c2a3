//! Kernel of the tenant shell host.
//!
//! Given tenant settings, [`shell::ShellContextFactory`] composes a blueprint from a baseline
//! descriptor, realizes it into an isolated resolution scope and resolves the top-level shell
//! service from it. Composition and scope creation are external collaborators described by the
//! traits in [`composition`]; the kernel only orchestrates them.
//!
//! ## ID generation
//! Use `safe_nanoid!` for URL-safe, unambiguous IDs:
//! ```rust
//! # use canopy_kernel::safe_nanoid;
//! let id = safe_nanoid!();
//! assert_eq!(id.len(), 12);
//! ```
//!
//! ## Config loading (non-wasm)
//! ```rust,ignore
//! use canopy_kernel::config::load_config;
//! let cfg: canopy_kernel::domain::config::HostConfig = load_config(Some("host.toml")).unwrap();
//! ```
pub mod baseline;
pub mod composition;
#[cfg(not(target_arch = "wasm32"))]
pub mod config;
pub mod prelude;
pub mod scope;
pub mod shell;

// Alphabet excludes visually ambiguous characters (I, O, l, 0, 1).
pub const SAFE_ALPHABET: &[char; 55] = &[
    '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'J', 'K', 'L',
    'M', 'N', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', 'a', 'b', 'c', 'd', 'e', 'f',
    'g', 'h', 'j', 'k', 'm', 'n', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
];

pub use canopy_domain as domain;
pub use nanoid::nanoid;

/// Error type collaborators report failures with.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Generates an unambiguous `NanoID` (no visually confusing characters).
#[macro_export]
macro_rules! safe_nanoid {
    () => {
        $crate::nanoid!(12, $crate::SAFE_ALPHABET)
    };
    ($size:expr) => {
        $crate::nanoid!($size, $crate::SAFE_ALPHABET)
    };
}
