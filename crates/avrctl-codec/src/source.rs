//! Input sources accepted by `SI`.

/// Source names the appliance accepts for `SI`. Matching is exact.
pub const INPUT_SOURCES: [&str; 27] = [
    "PHONO", "CD", "TUNER", "DVD", "BD", "TV", "SAT/CBL", "DVR", "GAME", "GAME2", "V.AUX", "DOCK",
    "HDRADIO", "IPOD", "NET/USB", "RHAPSODY", "NAPSTER", "PANDORA", "LASTFM", "FLICKR",
    "FAVORITES", "IRADIO", "SERVER", "USB/IPOD", "USB", "IPD", "FVP",
];

/// Returns true if `name` is a source the appliance can be switched to.
pub fn is_known_source(name: &str) -> bool {
    INPUT_SOURCES.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_sources() {
        assert!(is_known_source("SAT/CBL"));
        assert!(is_known_source("V.AUX"));
        assert!(!is_known_source("tuner"));
        assert!(!is_known_source("HDMI1"));
    }
}
