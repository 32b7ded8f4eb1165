//! Property tests for the reindent transform

use proptest::prelude::*;
use reindent_pp::{format_str, Config};

#[derive(Debug, Clone)]
enum Piece {
    Code(String),
    Neutral(&'static str, String),
    Block {
        opener: &'static str,
        body: Vec<Piece>,
        elifs: Vec<Vec<Piece>>,
        alt: Option<Vec<Piece>>,
    },
}

fn ws() -> impl Strategy<Value = String> {
    "[ \t]{0,3}"
}

fn piece() -> impl Strategy<Value = Piece> {
    let leaf = prop_oneof![
        "[a-z ;(){}=]{0,12}".prop_map(|s| Piece::Code(format!("x{s}"))),
        (
            prop::sample::select(vec!["define", "include", "pragma", "undef"]),
            ws()
        )
            .prop_map(|(k, w)| Piece::Neutral(k, w)),
    ];
    leaf.prop_recursive(4, 32, 4, |inner| {
        (
            prop::sample::select(vec!["if", "ifdef", "ifndef"]),
            prop::collection::vec(inner.clone(), 0..4),
            prop::collection::vec(prop::collection::vec(inner.clone(), 0..3), 0..3),
            prop::option::of(prop::collection::vec(inner, 0..4)),
        )
            .prop_map(|(opener, body, elifs, alt)| Piece::Block {
                opener,
                body,
                elifs,
                alt,
            })
    })
}

fn render(pieces: &[Piece], out: &mut Vec<String>) {
    for piece in pieces {
        match piece {
            Piece::Code(s) => out.push(s.clone()),
            Piece::Neutral(k, w) => out.push(format!("#{w}{k} X")),
            Piece::Block {
                opener,
                body,
                elifs,
                alt,
            } => {
                out.push(format!("#{opener} A"));
                render(body, out);
                for branch in elifs {
                    out.push("#   elif B".to_string());
                    render(branch, out);
                }
                if let Some(alt) = alt {
                    out.push("#  else".to_string());
                    render(alt, out);
                }
                out.push("# endif".to_string());
            }
        }
    }
}

fn source() -> impl Strategy<Value = String> {
    prop::collection::vec(piece(), 0..6).prop_map(|pieces| {
        let mut lines = Vec::new();
        render(&pieces, &mut lines);
        lines.iter().map(|l| format!("{l}\n")).collect()
    })
}

/// Drop everything between the marker and the keyword
fn strip_directive_indent(text: &str) -> String {
    text.split_inclusive('\n')
        .map(|line| match line.strip_prefix('#') {
            Some(rest) => format!("#{}", rest.trim_start()),
            None => line.to_string(),
        })
        .collect()
}

proptest! {
    #[test]
    fn reindent_is_idempotent(input in source()) {
        let config = Config::default();
        let once = format_str(&input, &config).unwrap();
        let twice = format_str(&once, &config).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn plain_lines_pass_through(input in source()) {
        let output = format_str(&input, &Config::default()).unwrap();
        prop_assert_eq!(input.lines().count(), output.lines().count());
        for (before, after) in input.lines().zip(output.lines()) {
            if !before.starts_with('#') {
                prop_assert_eq!(before, after);
            }
        }
    }

    #[test]
    fn only_directive_indent_changes(input in source()) {
        let output = format_str(&input, &Config::default()).unwrap();
        prop_assert_eq!(strip_directive_indent(&input), strip_directive_indent(&output));
    }

    #[test]
    fn unbalanced_input_fails(input in source()) {
        let config = Config::default();
        let extra_open = format!("{input}#if B\n");
        prop_assert!(format_str(&extra_open, &config).is_err());
        let extra_close = format!("{input}#endif\n");
        prop_assert!(format_str(&extra_close, &config).is_err());
    }
}
