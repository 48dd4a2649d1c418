#[cfg(test)]
#[path = "scroll_test.rs"]
mod tests;

/// Viewport offset for the transcript and note views. Follows the newest
/// line until the user scrolls up; scrolling back to the bottom resumes
/// following.
pub struct Scroll {
    pub position: u16,
    pub follow: bool,
}

impl Default for Scroll {
    fn default() -> Scroll {
        return Scroll {
            position: 0,
            follow: true,
        };
    }
}

impl Scroll {
    pub fn up(&mut self, lines: u16) {
        self.position = self.position.saturating_sub(lines);
        self.follow = false;
    }

    pub fn down(&mut self, lines: u16) {
        self.position = self.position.saturating_add(lines);
    }

    pub fn top(&mut self) {
        self.position = 0;
        self.follow = false;
    }

    /// Applied at render time once the real line count is known.
    pub fn clamp(&mut self, max: u16) {
        if self.follow || self.position >= max {
            self.position = max;
            self.follow = true;
        }
    }
}
