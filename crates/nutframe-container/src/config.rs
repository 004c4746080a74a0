/// Limits applied while loading a container description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadConfig {
    /// Maximum bytes read from a description file.
    pub max_description_size: usize,
    /// Maximum number of streams.
    pub max_streams: usize,
    /// Maximum number of elision headers, excluding the implicit empty one.
    pub max_elision_headers: usize,
    /// Maximum length of one elision header.
    pub max_elision_header_len: usize,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            max_description_size: 1024 * 1024,
            max_streams: 256,
            max_elision_headers: 128,
            max_elision_header_len: 128,
        }
    }
}
