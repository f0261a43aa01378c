//! Build script for dedupr.
//!
//! Handles platform-specific configuration:
//! - Windows: embeds the application manifest for long path support (>260 chars)
//!
//! By default Windows limits file paths to 260 characters (MAX_PATH), which
//! breaks scans of deeply nested trees such as `node_modules`. The manifest
//! (`dedupr.manifest`) sets `longPathAware=true`, which together with the
//! Windows 10 v1607+ registry setting raises the limit to 32,767 characters.
//!
//! On non-Windows platforms the script does nothing.

fn main() {
    #[cfg(windows)]
    {
        embed_resource::compile("dedupr.rc", embed_resource::NONE);

        println!("cargo:rerun-if-changed=dedupr.rc");
        println!("cargo:rerun-if-changed=dedupr.manifest");
    }
}
