// 命令行交互外壳
//
// 每行一条命令，驱动 MovieBrowser 并打印列表状态，用于在终端里浏览目录

use std::fmt::Write as _;

use crate::models::{FilterField, Interval, SortDirection, SortField};
use crate::services::{BrowseStatus, MovieBrowser};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// 提交搜索词，空字符串表示清除搜索
    Search(String),
    SortField(SortField),
    SortDirection(SortDirection),
    FilterOpen,
    FilterClose,
    FilterReset,
    ToggleGenre(String),
    ToggleCountry(String),
    ReleaseYears(Interval),
    Runtime(Interval),
    More,
    Layout { content: f64, viewport: f64 },
    Show,
    Detail(String),
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  search [text]            submit a search (empty clears it)
  sort <field>             rating | title | runtime | release_date | relevance
  dir <asc|desc>           sort direction
  filter open|close|reset  filter panel
  genre <name>             toggle a genre in the filter draft
  country <name>           toggle a production country in the filter draft
  years <from> <to>        release year range in the filter draft
  runtime <from> <to>      runtime range in the filter draft
  more                     request the next page
  layout <content> <view>  report measured content and viewport heights
  show                     list loaded movies
  detail <id>              show details for a movie
  quit";

pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (name, rest) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };

    match name.to_ascii_lowercase().as_str() {
        "search" | "s" => Ok(Command::Search(rest.to_string())),
        "sort" => rest.parse().map(Command::SortField),
        "dir" => rest.parse().map(Command::SortDirection),
        "filter" => match rest {
            "open" => Ok(Command::FilterOpen),
            "close" | "apply" => Ok(Command::FilterClose),
            "reset" => Ok(Command::FilterReset),
            other => Err(format!("Unknown filter action: {}", other)),
        },
        "genre" if !rest.is_empty() => Ok(Command::ToggleGenre(rest.to_string())),
        "country" if !rest.is_empty() => Ok(Command::ToggleCountry(rest.to_string())),
        "years" => parse_interval(rest).map(Command::ReleaseYears),
        "runtime" => parse_interval(rest).map(Command::Runtime),
        "more" | "m" => Ok(Command::More),
        "layout" => {
            let numbers = parse_numbers::<f64>(rest)?;
            match numbers.as_slice() {
                [content, viewport] => Ok(Command::Layout {
                    content: *content,
                    viewport: *viewport,
                }),
                _ => Err("layout needs two numbers".to_string()),
            }
        }
        "show" | "ls" => Ok(Command::Show),
        "detail" if !rest.is_empty() => Ok(Command::Detail(rest.to_string())),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        "" => Err("Empty command".to_string()),
        other => Err(format!("Unknown command: {}", other)),
    }
}

fn parse_numbers<T: std::str::FromStr>(raw: &str) -> Result<Vec<T>, String> {
    raw.split_whitespace()
        .map(|part| part.parse::<T>().map_err(|_| format!("Not a number: {}", part)))
        .collect()
}

fn parse_interval(raw: &str) -> Result<Interval, String> {
    match parse_numbers::<i32>(raw)?.as_slice() {
        [start, end] => Ok(Interval::new(*start, *end)),
        _ => Err("Interval needs two numbers".to_string()),
    }
}

/// 执行一条命令，返回要打印的文本；`Quit` 返回 None
pub async fn execute(browser: &mut MovieBrowser, command: Command) -> Option<String> {
    let mut out = String::new();

    match command {
        Command::Quit => return None,
        Command::Help => out.push_str(HELP),
        Command::Search(text) => browser.set_search(&text),
        Command::SortField(field) => browser.set_sort_field(field),
        Command::SortDirection(direction) => browser.set_sort_direction(direction),
        Command::FilterOpen => browser.open_filter(),
        Command::FilterClose => {
            if !browser.commit_filter() {
                out.push_str("filter unchanged\n");
            }
        }
        Command::FilterReset => {
            if !browser.reset_filter_draft() {
                out.push_str("open the filter panel first\n");
            }
        }
        Command::ToggleGenre(genre) => {
            browser.toggle_genre(&genre);
        }
        Command::ToggleCountry(country) => {
            browser.toggle_country(&country);
        }
        Command::ReleaseYears(interval) => {
            browser.set_filter_draft_field(FilterField::ReleaseYear(interval));
        }
        Command::Runtime(interval) => {
            browser.set_filter_draft_field(FilterField::Runtime(interval));
        }
        Command::More => {
            if !browser.request_more() {
                out.push_str("nothing more to load\n");
            }
        }
        Command::Layout { content, viewport } => {
            browser.on_layout(content, viewport);
        }
        Command::Show => {
            for (i, movie) in browser.current_results().iter().enumerate() {
                let rating = movie
                    .rating
                    .map(|r| format!("{:.1}", r))
                    .unwrap_or_else(|| "-".to_string());
                let _ = writeln!(out, "{:>4}. [{}] {} ({})", i + 1, movie.id, movie.title, rating);
            }
        }
        Command::Detail(id) => {
            browser.open_popup(&id);
            match browser.popup_detail().await {
                Ok(Some(detail)) => {
                    let _ = writeln!(out, "{}", detail.original_title);
                    if let Some(year) = detail.release_year() {
                        let _ = writeln!(out, "  released: {}", year);
                    }
                    if let Some(runtime) = detail.runtime {
                        let _ = writeln!(out, "  runtime: {} min", runtime);
                    }
                    if !detail.genres.is_empty() {
                        let _ = writeln!(out, "  genres: {}", detail.genres.join(", "));
                    }
                    if let Some(overview) = &detail.overview {
                        let _ = writeln!(out, "  {}", overview);
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    let _ = writeln!(out, "failed to load {}: {}", id, e);
                }
            }
            browser.close_popup();
        }
    }

    browser.run_pending().await;
    out.push_str(&status_line(browser));
    Some(out)
}

pub fn status_line(browser: &MovieBrowser) -> String {
    let state = browser.state();
    let sort = browser.store().sort.get();
    let mut line = format!(
        "[{:?}] {} loaded, page {}/{}, sort {}",
        browser.status(),
        state.accumulated.len(),
        state.current_page,
        state.page_count,
        sort.field.label()
    );
    if sort.direction_applies() {
        let _ = write!(line, " {}", sort.direction);
    }
    if let Some(footer) = browser.footer_text() {
        let _ = write!(line, " - {}", footer);
    }
    if browser.status() == BrowseStatus::Errored {
        if let Some(error) = browser.last_error() {
            let _ = write!(line, " ({})", error);
        }
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search() {
        assert_eq!(parse_command("search the dark knight"), Ok(Command::Search("the dark knight".to_string())));
        assert_eq!(parse_command("search"), Ok(Command::Search(String::new())));
    }

    #[test]
    fn test_parse_sort() {
        assert_eq!(parse_command("sort title"), Ok(Command::SortField(SortField::Title)));
        assert_eq!(parse_command("dir ASC"), Ok(Command::SortDirection(SortDirection::Asc)));
        assert!(parse_command("sort popularity").is_err());
    }

    #[test]
    fn test_parse_filter() {
        assert_eq!(parse_command("filter open"), Ok(Command::FilterOpen));
        assert_eq!(parse_command("filter apply"), Ok(Command::FilterClose));
        assert_eq!(parse_command("genre Science Fiction"), Ok(Command::ToggleGenre("Science Fiction".to_string())));
        assert_eq!(parse_command("years 1990 2000"), Ok(Command::ReleaseYears(Interval::new(1990, 2000))));
        assert!(parse_command("runtime 90").is_err());
    }

    #[test]
    fn test_parse_layout() {
        assert_eq!(
            parse_command("layout 420.5 900"),
            Ok(Command::Layout { content: 420.5, viewport: 900.0 })
        );
        assert!(parse_command("layout tall 900").is_err());
    }

    #[test]
    fn test_parse_unknown() {
        assert!(parse_command("").is_err());
        assert!(parse_command("rewind").is_err());
        assert_eq!(parse_command("q"), Ok(Command::Quit));
    }
}
