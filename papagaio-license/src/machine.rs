//! Host machine identifier stored in new trial records.

use std::path::Path;

use sha2::{Digest, Sha256};

pub const MACHINE_ID_PATH: &str = "/etc/machine-id";

const NET_CLASS_DIR: &str = "/sys/class/net";

/// `/etc/machine-id` when available, otherwise a stable hash of host, user
/// and hardware address.
pub fn machine_id() -> String {
    machine_id_from(Path::new(MACHINE_ID_PATH))
}

pub fn machine_id_from(path: &Path) -> String {
    match std::fs::read_to_string(path) {
        Ok(contents) if !contents.trim().is_empty() => contents.trim().to_string(),
        _ => {
            tracing::debug!(path = %path.display(), "machine-id unavailable, using fallback");
            let node = hardware_node_from(Path::new(NET_CLASS_DIR)).unwrap_or_default();
            fallback_id(&hostname(), &username(), &node)
        }
    }
}

/// First 32 hex chars of `sha256("<host>-<user>-<node>")`. `node` is empty
/// when no hardware address could be found.
fn fallback_id(host: &str, user: &str, node: &str) -> String {
    let mut h = Sha256::new();
    h.update(format!("{host}-{user}-{node}").as_bytes());
    let mut id = hex::encode(h.finalize());
    id.truncate(32);
    id
}

/// MAC address of the first interface (by name) with a non-zero address.
/// Loopback and virtual interfaces report all zeros and are skipped.
fn hardware_node_from(net_dir: &Path) -> Option<String> {
    let mut names: Vec<_> = std::fs::read_dir(net_dir)
        .ok()?
        .filter_map(|entry| entry.ok().map(|e| e.file_name()))
        .collect();
    names.sort();

    names.into_iter().find_map(|name| {
        let addr = std::fs::read_to_string(net_dir.join(&name).join("address")).ok()?;
        let addr = addr.trim().to_ascii_lowercase();
        let nonzero = addr.chars().any(|c| c.is_ascii_hexdigit() && c != '0');
        nonzero.then_some(addr)
    })
}

fn hostname() -> String {
    std::fs::read_to_string("/etc/hostname")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| std::env::var("HOSTNAME").ok())
        .unwrap_or_else(|| "localhost".to_string())
}

fn username() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "user".to_string())
}
