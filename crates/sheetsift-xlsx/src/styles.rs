//! Style metadata seam
//!
//! Parsing `styles.xml` is out of scope here; callers that already hold the
//! cell formats hand them to the cursor through [`StyleLookup`].

/// Maps a cell's style index (`s` attribute) to its number format code
pub trait StyleLookup {
    fn number_format(&self, style_index: u32) -> Option<&str>;
}

/// Format codes indexed directly by style index
impl StyleLookup for [String] {
    fn number_format(&self, style_index: u32) -> Option<&str> {
        self.get(style_index as usize).map(String::as_str)
    }
}

impl StyleLookup for Vec<String> {
    fn number_format(&self, style_index: u32) -> Option<&str> {
        self.as_slice().number_format(style_index)
    }
}
