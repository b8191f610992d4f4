use std::collections::HashSet;
use std::io::{self, BufRead, Write};

/// Ask for the roster file on stdin. Callers pass the streams so tests can
/// run against buffers.
pub fn prompt_roster_path(
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> io::Result<String> {
    write!(output, "Path to the roster CSV file: ")?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// List the groups found in the roster and ask which ones to render.
pub fn prompt_group_selection(
    available: &[String],
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> io::Result<Vec<String>> {
    writeln!(output, "Available groups: {}", available.join(", "))?;
    write!(output, "Groups to render as table images (comma separated): ")?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(parse_group_selection(&line))
}

/// Split a comma-separated selection, trimming entries and dropping blanks
/// and repeats while keeping first-seen order.
pub fn parse_group_selection(raw: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter(|entry| seen.insert(entry.to_string()))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{parse_group_selection, prompt_group_selection, prompt_roster_path};
    use std::io::Cursor;

    #[test]
    fn selection_is_trimmed_deduped_and_ordered() {
        assert_eq!(
            parse_group_selection(" 101 , 102 ,, 101 ,IS-31 "),
            vec!["101".to_string(), "102".to_string(), "IS-31".to_string()]
        );
        assert!(parse_group_selection("  ").is_empty());
        assert!(parse_group_selection(",,,").is_empty());
    }

    #[test]
    fn roster_prompt_returns_trimmed_line() {
        let mut input = Cursor::new(b"  data/roster.csv  \n".to_vec());
        let mut output = Vec::new();
        let path = prompt_roster_path(&mut input, &mut output).expect("read path");
        assert_eq!(path, "data/roster.csv");
        assert!(String::from_utf8(output).expect("utf8").contains("roster CSV"));
    }

    #[test]
    fn group_prompt_lists_available_groups() {
        let available = vec!["101".to_string(), "102".to_string()];
        let mut input = Cursor::new(b"102\n".to_vec());
        let mut output = Vec::new();
        let groups =
            prompt_group_selection(&available, &mut input, &mut output).expect("read selection");
        assert_eq!(groups, vec!["102".to_string()]);
        assert!(
            String::from_utf8(output)
                .expect("utf8")
                .contains("Available groups: 101, 102")
        );
    }
}
