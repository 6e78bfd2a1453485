use memchr::memchr_iter;

/// Check if content is likely binary
pub fn is_binary(content: &[u8]) -> bool {
    let sample_size = content.len().min(8192);
    let sample = &content[..sample_size];

    // Check for null bytes
    let null_count = sample.iter().filter(|&&b| b == 0).count();
    if null_count > sample_size / 10 {
        return true;
    }

    // Check for high proportion of non-text bytes
    let non_text_count = sample
        .iter()
        .filter(|&&b| b < 0x20 && b != b'\n' && b != b'\r' && b != b'\t')
        .count();

    non_text_count > sample_size / 8
}

/// Maps byte offsets in a buffer to lines.
///
/// Built lazily per file, only when the file has at least one match.
pub struct LineIndex<'a> {
    content: &'a [u8],
    /// Byte offset of the first byte of every line
    starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(content: &'a [u8]) -> Self {
        let mut starts = Vec::with_capacity(content.len() / 40 + 1);
        starts.push(0);
        starts.extend(memchr_iter(b'\n', content).map(|nl| nl + 1));
        Self { content, starts }
    }

    /// 1-based line number and 0-based byte column of `offset`
    pub fn locate(&self, offset: usize) -> (usize, usize) {
        let line = match self.starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(next) => next - 1,
        };
        (line + 1, offset - self.starts[line])
    }

    /// Content of the 1-based `line_number`, without the line terminator
    pub fn line(&self, line_number: usize) -> &'a [u8] {
        let start = self.starts[line_number - 1];
        let end = self
            .starts
            .get(line_number)
            .map(|&next| next - 1)
            .unwrap_or(self.content.len());
        let line = &self.content[start..end];
        line.strip_suffix(b"\r").unwrap_or(line)
    }
}

/// Lossily decode `raw`, carrying a byte `column` over to the decoded text.
///
/// Invalid sequences widen to U+FFFD, so the returned column can be larger
/// than the one passed in.
pub fn decode_line(raw: &[u8], column: usize) -> (String, usize) {
    let column = column.min(raw.len());
    let mut line = String::from_utf8_lossy(&raw[..column]).into_owned();
    let decoded_column = line.len();
    line.push_str(&String::from_utf8_lossy(&raw[column..]));
    (line, decoded_column)
}
