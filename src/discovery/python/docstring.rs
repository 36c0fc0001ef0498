//! Structured docstring parsing (reST, Google and NumPy styles).

use once_cell::sync::Lazy;
use regex::Regex;

static REST_FIELD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^:(\w+)(?:\s+([^:]+?))?\s*:\s*(.*)$").expect("valid reST field regex")
});

static GOOGLE_SECTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Z][A-Za-z ]*):\s*$").expect("valid section regex"));

static GOOGLE_ENTRY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\*{0,2}\w+)\s*(?:\(([^)]*)\))?\s*:\s*(.*)$").expect("valid entry regex")
});

static NUMPY_UNDERLINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-{3,}\s*$").expect("valid underline regex"));

const PARAM_SECTIONS: &[&str] = &[
    "Args",
    "Arguments",
    "Parameters",
    "Params",
    "Keyword Args",
    "Keyword Arguments",
    "Other Parameters",
];
const RETURN_SECTIONS: &[&str] = &["Returns", "Return", "Yields"];

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParamDoc {
    pub name: String,
    pub type_text: Option<String>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReturnDoc {
    pub name: Option<String>,
    pub type_text: Option<String>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Docstring {
    /// Free text before the first structured section, on one line.
    pub description: String,
    pub params: Vec<ParamDoc>,
    pub returns: Option<ReturnDoc>,
}

impl Docstring {
    pub fn param(&self, name: &str) -> Option<&ParamDoc> {
        let bare = name.trim_start_matches('*');
        self.params
            .iter()
            .find(|param| param.name.trim_start_matches('*') == bare)
    }

    fn param_mut(&mut self, name: &str) -> &mut ParamDoc {
        let bare = name.trim_start_matches('*').to_string();
        match self.params.iter().position(|p| p.name == bare) {
            Some(index) => &mut self.params[index],
            None => {
                self.params.push(ParamDoc {
                    name: bare,
                    ..ParamDoc::default()
                });
                let last = self.params.len() - 1;
                &mut self.params[last]
            }
        }
    }

    fn returns_mut(&mut self) -> &mut ReturnDoc {
        self.returns.get_or_insert_with(ReturnDoc::default)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocStyle {
    Rest,
    Google,
    Numpy,
    Plain,
}

/// Remove the common leading indentation, ignoring the first line.
pub fn clean_docstring(text: &str) -> Vec<String> {
    let lines: Vec<&str> = text.lines().collect();
    let margin = lines
        .iter()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    let mut cleaned: Vec<String> = lines
        .iter()
        .enumerate()
        .map(|(index, line)| {
            if index == 0 {
                line.trim().to_string()
            } else {
                line.get(margin..).unwrap_or_else(|| line.trim_start()).trim_end().to_string()
            }
        })
        .collect();

    while cleaned.first().is_some_and(|line| line.is_empty()) {
        cleaned.remove(0);
    }
    while cleaned.last().is_some_and(|line| line.is_empty()) {
        cleaned.pop();
    }
    cleaned
}

pub fn detect_style(lines: &[String]) -> DocStyle {
    if lines.iter().any(|line| REST_FIELD.is_match(line.trim_start())) {
        return DocStyle::Rest;
    }
    if lines.windows(2).any(|pair| {
        is_known_section(pair[0].trim()) && NUMPY_UNDERLINE.is_match(pair[1].trim())
    }) {
        return DocStyle::Numpy;
    }
    if lines.iter().any(|line| {
        GOOGLE_SECTION
            .captures(line)
            .is_some_and(|caps| is_known_section(&caps[1]))
    }) {
        return DocStyle::Google;
    }
    DocStyle::Plain
}

fn is_known_section(name: &str) -> bool {
    PARAM_SECTIONS.contains(&name)
        || RETURN_SECTIONS.contains(&name)
        || matches!(
            name,
            "Raises" | "Notes" | "Examples" | "Example" | "See Also" | "References" | "Attributes"
                | "Warnings" | "Note"
        )
}

pub fn parse_docstring(text: &str) -> Docstring {
    let lines = clean_docstring(text);
    match detect_style(&lines) {
        DocStyle::Rest => parse_rest(&lines),
        DocStyle::Google => parse_google(&lines),
        DocStyle::Numpy => parse_numpy(&lines),
        DocStyle::Plain => Docstring {
            description: join_text(lines.iter().map(String::as_str)),
            ..Docstring::default()
        },
    }
}

fn join_text<'a>(lines: impl Iterator<Item = &'a str>) -> String {
    lines
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn append(target: &mut String, text: &str) {
    let text = text.trim();
    if text.is_empty() {
        return;
    }
    if !target.is_empty() {
        target.push(' ');
    }
    target.push_str(text);
}

enum Target {
    Summary,
    Param(String),
    Returns,
    Ignored,
}

fn parse_rest(lines: &[String]) -> Docstring {
    let mut doc = Docstring::default();
    let mut target = Target::Summary;

    for line in lines {
        let trimmed = line.trim_start();
        if let Some(caps) = REST_FIELD.captures(trimmed) {
            let directive = &caps[1];
            let argument = caps.get(2).map(|m| m.as_str().trim()).unwrap_or("");
            let rest = caps.get(3).map(|m| m.as_str()).unwrap_or("");
            target = match directive {
                "param" | "parameter" | "arg" | "argument" | "key" | "keyword" => {
                    let mut words: Vec<&str> = argument.split_whitespace().collect();
                    match words.pop() {
                        Some(name) => {
                            let param = doc.param_mut(name);
                            if !words.is_empty() {
                                param.type_text = Some(words.join(" "));
                            }
                            append(&mut param.description, rest);
                            Target::Param(name.trim_start_matches('*').to_string())
                        }
                        None => Target::Ignored,
                    }
                }
                "type" if !argument.is_empty() => {
                    doc.param_mut(argument).type_text = Some(rest.trim().to_string());
                    Target::Ignored
                }
                "returns" | "return" => {
                    append(&mut doc.returns_mut().description, rest);
                    Target::Returns
                }
                "rtype" => {
                    doc.returns_mut().type_text = Some(rest.trim().to_string());
                    Target::Ignored
                }
                _ => Target::Ignored,
            };
            continue;
        }

        match &target {
            Target::Summary => append(&mut doc.description, line),
            Target::Param(name) => {
                let name = name.clone();
                append(&mut doc.param_mut(&name).description, line);
            }
            Target::Returns => append(&mut doc.returns_mut().description, line),
            Target::Ignored => {}
        }
    }
    doc
}

fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

fn parse_google(lines: &[String]) -> Docstring {
    let mut doc = Docstring::default();
    let mut section: Option<String> = None;
    let mut entry_indent: Option<usize> = None;
    let mut target = Target::Summary;

    for line in lines {
        if let Some(caps) = GOOGLE_SECTION.captures(line) {
            if is_known_section(&caps[1]) {
                section = Some(caps[1].to_string());
                entry_indent = None;
                target = Target::Ignored;
                continue;
            }
        }
        if line.trim().is_empty() {
            continue;
        }

        let Some(name) = section.as_deref() else {
            append(&mut doc.description, line);
            continue;
        };

        let indent = indent_of(line);
        let is_entry = match entry_indent {
            None => {
                entry_indent = Some(indent);
                true
            }
            Some(level) => indent <= level,
        };

        if PARAM_SECTIONS.contains(&name) {
            if is_entry {
                target = match GOOGLE_ENTRY.captures(line.trim()) {
                    Some(caps) => {
                        let param = doc.param_mut(&caps[1]);
                        param.type_text = caps.get(2).map(|m| m.as_str().trim().to_string());
                        append(&mut param.description, &caps[3]);
                        Target::Param(caps[1].trim_start_matches('*').to_string())
                    }
                    None => Target::Ignored,
                };
            } else if let Target::Param(param) = &target {
                let param = param.clone();
                append(&mut doc.param_mut(&param).description, line);
            }
        } else if RETURN_SECTIONS.contains(&name) {
            let returns = doc.returns_mut();
            if is_entry && returns.description.is_empty() && returns.type_text.is_none() {
                match line.trim().split_once(':') {
                    Some((type_text, rest)) if !type_text.trim().contains(' ') => {
                        returns.type_text = Some(type_text.trim().to_string());
                        append(&mut returns.description, rest);
                    }
                    _ => append(&mut returns.description, line),
                }
            } else {
                append(&mut returns.description, line);
            }
            target = Target::Returns;
        }
    }
    doc
}

fn parse_numpy(lines: &[String]) -> Docstring {
    let mut doc = Docstring::default();
    let mut section: Option<&str> = None;
    let mut target = Target::Summary;
    let mut index = 0;

    while index < lines.len() {
        let line = &lines[index];
        let heading = line.trim();
        if is_known_section(heading)
            && lines
                .get(index + 1)
                .is_some_and(|next| NUMPY_UNDERLINE.is_match(next.trim()))
        {
            section = Some(heading);
            target = Target::Ignored;
            index += 2;
            continue;
        }
        index += 1;
        if heading.is_empty() {
            continue;
        }

        let Some(name) = section else {
            append(&mut doc.description, line);
            continue;
        };

        let is_entry = indent_of(line) == 0;
        if PARAM_SECTIONS.contains(&name) {
            if is_entry {
                let (names, type_text) = match heading.split_once(" : ") {
                    Some((names, type_text)) => (names, Some(type_text.trim().to_string())),
                    None => (heading.trim_end_matches(':'), None),
                };
                // `x, y : int` documents several parameters at once.
                let names: Vec<&str> = names.split(',').map(str::trim).collect();
                for param in &names {
                    doc.param_mut(param).type_text = type_text.clone();
                }
                target = Target::Param(names.join(","));
            } else if let Target::Param(params) = &target {
                let params = params.clone();
                for param in params.split(',') {
                    append(&mut doc.param_mut(param).description, line);
                }
            }
        } else if RETURN_SECTIONS.contains(&name) {
            let returns = doc.returns_mut();
            if is_entry && returns.type_text.is_none() && returns.name.is_none() {
                match heading.split_once(" : ") {
                    Some((name, type_text)) => {
                        returns.name = Some(name.trim().to_string());
                        returns.type_text = Some(type_text.trim().to_string());
                    }
                    None => returns.type_text = Some(heading.to_string()),
                }
            } else {
                append(&mut returns.description, line);
            }
            target = Target::Returns;
        }
    }
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn test_rest_style() {
        let doc = parse_docstring(indoc! {"
            Add two numbers.

            :param int a: first operand
            :param b: second operand,
                continued here
            :type b: float
            :returns: the sum
            :rtype: float
        "});

        assert_eq!(doc.description, "Add two numbers.");
        assert_eq!(doc.param("a").unwrap().type_text.as_deref(), Some("int"));
        let b = doc.param("b").unwrap();
        assert_eq!(b.type_text.as_deref(), Some("float"));
        assert_eq!(b.description, "second operand, continued here");
        let returns = doc.returns.unwrap();
        assert_eq!(returns.type_text.as_deref(), Some("float"));
        assert_eq!(returns.description, "the sum");
    }

    #[test]
    fn test_google_style() {
        let doc = parse_docstring(indoc! {"
            Scale an array.

            Args:
                data (list): values to scale
                factor (float, optional): multiplier
                    applied to each value
                *args: passed through

            Returns:
                list: the scaled values
        "});

        assert_eq!(doc.description, "Scale an array.");
        assert_eq!(doc.param("data").unwrap().type_text.as_deref(), Some("list"));
        let factor = doc.param("factor").unwrap();
        assert_eq!(factor.type_text.as_deref(), Some("float, optional"));
        assert_eq!(factor.description, "multiplier applied to each value");
        assert!(doc.param("args").is_some());
        let returns = doc.returns.unwrap();
        assert_eq!(returns.type_text.as_deref(), Some("list"));
        assert_eq!(returns.description, "the scaled values");
    }

    #[test]
    fn test_numpy_style() {
        let doc = parse_docstring(indoc! {"
            Compute a histogram.

            Parameters
            ----------
            values : array_like
                Input data.
            bins, edges : int, optional
                Bin count.

            Returns
            -------
            hist : ndarray
                The counts.
        "});

        assert_eq!(doc.description, "Compute a histogram.");
        assert_eq!(doc.param("values").unwrap().description, "Input data.");
        assert_eq!(doc.param("edges").unwrap().type_text.as_deref(), Some("int, optional"));
        let returns = doc.returns.unwrap();
        assert_eq!(returns.name.as_deref(), Some("hist"));
        assert_eq!(returns.type_text.as_deref(), Some("ndarray"));
        assert_eq!(returns.description, "The counts.");
    }

    #[test]
    fn test_plain_text_docstring() {
        let doc = parse_docstring("Just a sentence\n    over two lines.");
        assert_eq!(doc.description, "Just a sentence over two lines.");
        assert!(doc.params.is_empty());
        assert!(doc.returns.is_none());
    }
}
