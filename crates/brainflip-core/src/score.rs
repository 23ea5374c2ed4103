use serde::Serialize;

/// Point total of a single completed game.
///
/// Submitted scores are always non-negative; values read back from an
/// edited score file may not be, and are still ranked as-is.
pub type Score = i64;

/// Number of scores kept on the leaderboard.
pub const MAX_TOP_SCORES: usize = 5;

/// The top scores, highest first. Never holds more than [`MAX_TOP_SCORES`].
///
/// Serializes as a bare JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Leaderboard(Vec<Score>);

impl Leaderboard {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Rank an arbitrary collection of scores: sort descending, keep the top.
    pub fn from_scores(scores: impl IntoIterator<Item = Score>) -> Self {
        let mut scores: Vec<Score> = scores.into_iter().collect();
        scores.sort_unstable_by(|a, b| b.cmp(a));
        scores.truncate(MAX_TOP_SCORES);
        Self(scores)
    }

    /// Parse score file contents. Blank and unparseable lines are dropped.
    pub fn parse(text: &str) -> Self {
        Self::from_scores(text.split('\n').filter_map(parse_line))
    }

    /// Add a score and re-rank. The lowest entry falls off when full.
    pub fn with_score(mut self, score: Score) -> Self {
        self.0.push(score);
        Self::from_scores(self.0)
    }

    /// Render as score file contents: one decimal per line, trailing newline.
    pub fn to_file_text(&self) -> String {
        let lines: Vec<String> = self.0.iter().map(Score::to_string).collect();
        let mut text = lines.join("\n");
        text.push('\n');
        text
    }

    pub fn scores(&self) -> &[Score] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Parse one score file line.
///
/// Reads an optional sign followed by the leading run of decimal digits and
/// ignores whatever trails it, so `"12abc"` is 12 and `"3.7"` is 3. Returns
/// `None` for blank lines, lines without leading digits, and values that do
/// not fit a [`Score`].
pub fn parse_line(line: &str) -> Option<Score> {
    let line = line.trim();
    let sign_len = usize::from(line.starts_with(['+', '-']));
    let digits = line[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits == 0 {
        return None;
    }
    line[..sign_len + digits].parse().ok()
}
