use log::debug;

/// Tidies pasted chord sheets before parsing: trailing whitespace goes,
/// double-spaced text is closed up, runs of blank lines shrink to one and
/// blank lines at either end are dropped.
pub fn clean_text(text: &str) -> String {
    let lines: Vec<&str> = text.lines().map(str::trim_end).collect();

    let lines = if is_double_spaced(&lines) {
        debug!("closing up double-spaced text");
        close_up(&lines)
    } else {
        lines
    };

    let mut cleaned: Vec<&str> = Vec::with_capacity(lines.len());
    for line in lines {
        let previous_blank = cleaned.last().is_none_or(|last| last.is_empty());
        if line.is_empty() && previous_blank {
            continue;
        }
        cleaned.push(line);
    }
    while cleaned.last().is_some_and(|line| line.is_empty()) {
        cleaned.pop();
    }

    let mut result = cleaned.join("\n");
    if !result.is_empty() {
        result.push('\n');
    }
    result
}

fn is_double_spaced(lines: &[&str]) -> bool {
    let content = lines.iter().filter(|line| !line.is_empty()).count();
    content >= 2
        && lines
            .windows(2)
            .all(|pair| pair[0].is_empty() || pair[1].is_empty())
}

fn close_up<'a>(lines: &[&'a str]) -> Vec<&'a str> {
    let mut result = Vec::with_capacity(lines.len() / 2 + 1);
    let mut blanks = 0;
    for &line in lines {
        if line.is_empty() {
            blanks += 1;
            continue;
        }
        result.extend(std::iter::repeat_n("", blanks / 2));
        blanks = 0;
        result.push(line);
    }
    result
}
