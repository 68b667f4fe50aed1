use xsm_core::SessionFileEntry;

pub struct TableFormatter {
    index_width: usize,
    name_width: usize,
    created_width: usize,
    windows_width: usize,
    path_width: usize,
}

impl TableFormatter {
    pub fn new(entries: &[SessionFileEntry]) -> Self {
        let name_width = entries
            .iter()
            .map(|e| e.name.chars().count())
            .max()
            .unwrap_or(16)
            .clamp(7, 40); // Between "Session" header min and reasonable terminal width max
        let path_width = entries
            .iter()
            .map(|e| e.path.display().to_string().chars().count())
            .max()
            .unwrap_or(20)
            .clamp(8, 70);
        let created_width = entries
            .iter()
            .map(|e| e.created_at.chars().count())
            .max()
            .unwrap_or(19)
            .clamp(7, 26);
        let index_width = entries.len().to_string().len().max(1);

        Self {
            index_width,
            name_width,
            created_width,
            windows_width: 7,
            path_width,
        }
    }

    pub fn print_table(&self, entries: &[SessionFileEntry]) {
        self.print_header();
        for (i, entry) in entries.iter().enumerate() {
            self.print_row(i + 1, entry);
        }
        self.print_footer();
    }

    fn print_header(&self) {
        println!("{}", self.border('┌', '┬', '┐'));
        println!("{}", self.header_row());
        println!("{}", self.border('├', '┼', '┤'));
    }

    fn print_footer(&self) {
        println!("{}", self.border('└', '┴', '┘'));
    }

    fn print_row(&self, index: usize, entry: &SessionFileEntry) {
        println!(
            "│ {:>width_index$} │ {:<width_name$} │ {:<width_created$} │ {:>width_windows$} │ {:<width_path$} │",
            index,
            truncate(&entry.name, self.name_width),
            truncate(&entry.created_at, self.created_width),
            entry.windows_count,
            truncate(&entry.path.display().to_string(), self.path_width),
            width_index = self.index_width,
            width_name = self.name_width,
            width_created = self.created_width,
            width_windows = self.windows_width,
            width_path = self.path_width,
        );
    }

    fn header_row(&self) -> String {
        format!(
            "│ {:>width_index$} │ {:<width_name$} │ {:<width_created$} │ {:>width_windows$} │ {:<width_path$} │",
            "#",
            "Session",
            "Created",
            "Windows",
            "Location",
            width_index = self.index_width,
            width_name = self.name_width,
            width_created = self.created_width,
            width_windows = self.windows_width,
            width_path = self.path_width,
        )
    }

    fn border(&self, left: char, middle: char, right: char) -> String {
        let columns = [
            self.index_width,
            self.name_width,
            self.created_width,
            self.windows_width,
            self.path_width,
        ];
        let segments: Vec<String> = columns.iter().map(|w| "─".repeat(w + 2)).collect();
        format!("{}{}{}", left, segments.join(&middle.to_string()), right)
    }
}

/// Truncate a string to a maximum display width, adding "..." if truncated.
///
/// Uses character count (not byte count) to safely handle UTF-8 strings
/// including emoji and multi-byte characters.
pub fn truncate(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        format!("{:<width$}", s, width = max_len)
    } else {
        // Safely truncate at character boundaries, not byte boundaries
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{:<width$}", format!("{}...", truncated), width = max_len)
    }
}
