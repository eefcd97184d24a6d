//! Constants shared across the pipeline.

/// License file shipped at the root of the pjproject source tree.
pub const LICENSE_FILE: &str = "COPYING";

/// Compiler define enabling IPv6 support in the PJLIB socket layer.
pub const IPV6_DEFINE: &str = "-DPJ_HAS_IPV6=1";

/// Configure-time assignment working around the wcwidth probe, which tries
/// to run a test executable and cannot do so under cross-compilation.
pub const WCWIDTH_WORKAROUND: &str = "bash_cv_wcwidth_broken=yes";

/// Name consumers use to locate the package through CMake's find machinery.
pub const CMAKE_FILE_NAME: &str = "pjproject";

/// Name consumers use to locate the package through pkg-config.
pub const PKG_CONFIG_NAME: &str = "libpjproject";
