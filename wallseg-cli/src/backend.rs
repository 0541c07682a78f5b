//! Compile-time backend choice for the `wallseg` binary.
//!
//! `cuda` wins over `wgpu`; without either, tensors live on the ndarray CPU backend.

use std::fmt;

use burn::prelude::*;
use cfg_if::cfg_if;

cfg_if! {
    if #[cfg(feature = "cuda")] {
        pub type SelectedBackend = burn::backend::Cuda;
        const BACKEND: &str = "cuda";
    } else if #[cfg(feature = "wgpu")] {
        pub type SelectedBackend = burn::backend::Wgpu;
        const BACKEND: &str = "wgpu";
    } else if #[cfg(any(feature = "openblas", feature = "openblas-system"))] {
        pub type SelectedBackend = burn::backend::NdArray;
        const BACKEND: &str = "ndarray+openblas";
    } else {
        pub type SelectedBackend = burn::backend::NdArray;
        const BACKEND: &str = "ndarray";
    }
}

/// The backend this binary was built for and the device commands run on.
#[derive(Debug, Clone)]
pub struct Runtime {
    pub backend: &'static str,
    pub fused: bool,
    pub device: Device<SelectedBackend>,
}

impl Runtime {
    pub fn new() -> Self {
        Self {
            backend: BACKEND,
            fused: cfg!(feature = "fusion"),
            device: Default::default(),
        }
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.backend)?;
        if self.fused {
            write!(f, " (fusion)")?;
        }
        write!(f, " on {:?}", self.device)
    }
}
