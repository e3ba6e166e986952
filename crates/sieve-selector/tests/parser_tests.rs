//! Integration tests for building selector ASTs.

use pretty_assertions::assert_eq;
use sieve_selector::{
    Ast, Combinator, ListError, MAX_COMBINATOR_CHAIN, MAX_NESTING_DEPTH, ParseOptions,
    SelectorError, SelectorParser, Specificity, Token, TokenKind, TokenType, parse, parse_tokens,
    specificity, stringify, stringify_tokens, tokenize,
};

fn ast(selector: &str) -> Ast {
    parse(selector, ParseOptions::default()).unwrap().unwrap()
}

fn token_types(ast: &Ast) -> Vec<TokenType> {
    ast.tokens().into_iter().map(Token::token_type).collect()
}

#[test]
fn test_absent_selector() {
    assert_eq!(parse(None::<&str>, ParseOptions::default()).unwrap(), None);
}

#[test]
fn test_empty_selector_is_an_error() {
    assert_eq!(
        parse("", ParseOptions::default()).unwrap_err(),
        SelectorError::EmptyConstruct
    );
}

#[test]
fn test_single_token_is_unwrapped() {
    let Ast::Token(token) = ast("#foo") else {
        panic!("expected a bare token");
    };
    assert_eq!(token.name(), Some("foo"));
    assert_eq!(token.pos, 0..4);
}

#[test]
fn test_compound_selector() {
    let Ast::Compound { list } = ast("div.a#b[c]") else {
        panic!("expected a compound selector");
    };
    let types: Vec<TokenType> = list.iter().map(Token::token_type).collect();
    assert_eq!(
        types,
        vec![
            TokenType::Type,
            TokenType::Class,
            TokenType::Id,
            TokenType::Attribute
        ]
    );
}

#[test]
fn test_rightmost_combinator_is_outermost() {
    let Ast::Complex {
        combinator,
        left,
        right,
    } = ast("a > b c")
    else {
        panic!("expected a complex selector");
    };
    assert_eq!(combinator, Combinator::Descendant);
    assert_eq!(right.stringify(), "c");

    let Ast::Complex {
        combinator,
        left: inner_left,
        right: inner_right,
    } = *left
    else {
        panic!("expected a nested complex selector");
    };
    assert_eq!(combinator, Combinator::Child);
    assert_eq!(inner_left.stringify(), "a");
    assert_eq!(inner_right.stringify(), "b");
}

#[test]
fn test_all_combinators() {
    for (selector, expected) in [
        ("a b", Combinator::Descendant),
        ("a > b", Combinator::Child),
        ("a + b", Combinator::NextSibling),
        ("a ~ b", Combinator::SubsequentSibling),
    ] {
        let Ast::Complex { combinator, .. } = ast(selector) else {
            panic!("expected a complex selector for {selector:?}");
        };
        assert_eq!(combinator, expected);
        assert_eq!(combinator.to_string(), expected.as_str());
    }
}

#[test]
fn test_selector_list() {
    let Ast::List { list } = ast("a, .b > c, #d") else {
        panic!("expected a selector list");
    };
    assert_eq!(list.len(), 3);
    assert!(matches!(list[0], Ast::Token(_)));
    assert!(matches!(
        list[1],
        Ast::Complex {
            combinator: Combinator::Child,
            ..
        }
    ));
    assert!(matches!(list[2], Ast::Token(_)));
}

#[test]
fn test_list_disabled_keeps_commas_in_compound() {
    let Ast::Compound { list } = parse("a,b", ParseOptions {
        recursive: true,
        list: false,
    })
    .unwrap()
    .unwrap() else {
        panic!("expected a compound selector");
    };
    assert_eq!(list.len(), 3);
    assert_eq!(list[1].token_type(), TokenType::Comma);
}

#[test]
fn test_leading_comma() {
    assert_eq!(
        parse(", a", ParseOptions::default()).unwrap_err(),
        SelectorError::MalformedSelectorList(ListError::IncorrectComma { offset: 0 })
    );
}

#[test]
fn test_adjacent_commas() {
    assert_eq!(
        parse("a,,b", ParseOptions::default()).unwrap_err(),
        SelectorError::MalformedSelectorList(ListError::IncorrectComma { offset: 2 })
    );
}

#[test]
fn test_trailing_comma() {
    let err = parse("a, b,", ParseOptions::default()).unwrap_err();
    assert_eq!(
        err,
        SelectorError::MalformedSelectorList(ListError::TrailingComma { offset: 4 })
    );
    assert_eq!(err.to_string(), "trailing comma at index 4");
}

#[test]
fn test_dangling_combinator() {
    assert_eq!(
        parse("a >", ParseOptions::default()).unwrap_err(),
        SelectorError::EmptyConstruct
    );
    assert_eq!(
        parse("> a", ParseOptions::default()).unwrap_err(),
        SelectorError::EmptyConstruct
    );
}

#[test]
fn test_recursive_subtree() {
    let Ast::Token(token) = ast(":not(.a, #b)") else {
        panic!("expected a bare token");
    };
    assert_eq!(token.argument(), Some(".a, #b"));
    let Some(Ast::List { list }) = token.subtree() else {
        panic!("expected a list subtree");
    };
    assert_eq!(list.len(), 2);
    // Subtree positions are relative to the argument.
    assert_eq!(list[1].tokens()[0].pos, 4..6);
}

#[test]
fn test_nested_recursive_subtrees() {
    let Ast::Token(token) = ast(":not(:where(#yolo))") else {
        panic!("expected a bare token");
    };
    let Some(Ast::Token(inner)) = token.subtree() else {
        panic!("expected a token subtree");
    };
    assert_eq!(inner.name(), Some("where"));
    let Some(Ast::Token(innermost)) = inner.subtree() else {
        panic!("expected a token subtree");
    };
    assert_eq!(innermost.name(), Some("yolo"));
}

#[test]
fn test_non_recursive_pseudo_class_has_no_subtree() {
    let Ast::Token(token) = ast(":hover") else {
        panic!("expected a bare token");
    };
    assert_eq!(token.subtree(), None);

    let Ast::Token(token) = ast(":lang(en)") else {
        panic!("expected a bare token");
    };
    assert_eq!(token.argument(), Some("en"));
    assert_eq!(token.subtree(), None);
}

#[test]
fn test_flat_parse_skips_subtrees() {
    let Ast::Token(token) = parse(":is(.a)", ParseOptions::flat()).unwrap().unwrap() else {
        panic!("expected a bare token");
    };
    assert_eq!(token.subtree(), None);
}

#[test]
fn test_nth_child_of_selector() {
    let Ast::Token(token) = ast(":nth-child(2n + 1 of li.item)") else {
        panic!("expected a bare token");
    };
    let TokenKind::PseudoClass {
        index, subtree, ..
    } = &token.kind
    else {
        panic!("expected a pseudo-class");
    };
    assert_eq!(index.as_deref(), Some("2n + 1"));
    assert_eq!(subtree.as_deref().map(Ast::stringify), Some("li.item".to_owned()));
}

#[test]
fn test_nth_child_plain_index_has_no_subtree() {
    for selector in [":nth-child(2n+1)", ":nth-last-child(odd)", ":nth-child(3)"] {
        let Ast::Token(token) = ast(selector) else {
            panic!("expected a bare token");
        };
        assert_eq!(token.subtree(), None, "{selector}");
        assert!(matches!(
            &token.kind,
            TokenKind::PseudoClass { index: None, .. }
        ));
    }
}

#[test]
fn test_subtree_errors_propagate() {
    assert_eq!(
        parse(":not(a,)", ParseOptions::default()).unwrap_err(),
        SelectorError::MalformedSelectorList(ListError::TrailingComma { offset: 1 })
    );
    // An empty argument is never masked, so the parens are left over.
    assert_eq!(
        parse(":is()", ParseOptions::default()).unwrap_err(),
        SelectorError::UnexpectedSequence {
            text: "()".to_owned(),
            offset: 3,
        }
    );
}

#[test]
fn test_nesting_limit() {
    let depth = MAX_NESTING_DEPTH + 1;
    let selector = format!("{}a{}", ":is(".repeat(depth), ")".repeat(depth));
    assert_eq!(
        parse(selector.as_str(), ParseOptions::default()).unwrap_err(),
        SelectorError::NestingTooDeep {
            limit: MAX_NESTING_DEPTH
        }
    );

    let selector = format!(
        "{}a{}",
        ":is(".repeat(MAX_NESTING_DEPTH),
        ")".repeat(MAX_NESTING_DEPTH)
    );
    assert!(parse(selector.as_str(), ParseOptions::default()).is_ok());
}

#[test]
fn test_combinator_chain_limit() {
    let limit = SelectorError::NestingTooDeep {
        limit: MAX_COMBINATOR_CHAIN,
    };
    let selector = "a ".repeat(10_000) + "b";
    assert_eq!(
        parse(selector.as_str(), ParseOptions::default()).unwrap_err(),
        limit
    );
    assert_eq!(specificity(selector.as_str()).unwrap_err(), limit);

    let selector = "a > ".repeat(MAX_COMBINATOR_CHAIN) + "b";
    let ast = parse(selector.as_str(), ParseOptions::default())
        .unwrap()
        .unwrap();
    let types = u32::try_from(MAX_COMBINATOR_CHAIN).unwrap() + 1;
    assert_eq!(ast.specificity(), Specificity(0, 0, types));
}

#[test]
fn test_combinator_chain_counts_through_pseudo_classes() {
    let half = MAX_COMBINATOR_CHAIN / 2;
    let inner = "a ".repeat(half + 1) + "b";
    let selector = format!("{}c:is({inner})", "d ".repeat(half));
    assert_eq!(
        parse(selector.as_str(), ParseOptions::default()).unwrap_err(),
        SelectorError::NestingTooDeep {
            limit: MAX_COMBINATOR_CHAIN
        }
    );

    // Alternatives of a list are counted on their own.
    let alternative = "a ".repeat(half) + "b";
    let selector = format!("{alternative}, {alternative}, {alternative}");
    assert!(parse(selector.as_str(), ParseOptions::default()).is_ok());
}

#[test]
fn test_parse_tokens() {
    let tokens = tokenize("ul > li").unwrap().unwrap();
    let ast = parse_tokens(tokens, ParseOptions::default()).unwrap();
    assert_eq!(ast, self::ast("ul > li"));
    assert_eq!(
        parse_tokens(Vec::new(), ParseOptions::default()).unwrap_err(),
        SelectorError::EmptyConstruct
    );
}

#[test]
fn test_parser_struct() {
    let parser = SelectorParser::new(ParseOptions::default());
    let ast = parser.parse_str("a.b").unwrap();
    assert_eq!(token_types(&ast), vec![TokenType::Type, TokenType::Class]);
}

#[test]
fn test_flatten_parents() {
    let ast = ast("a.b > c");
    let pairs = ast.flatten();
    assert_eq!(pairs.len(), 3);

    let (first, parent) = pairs[0];
    assert_eq!(first.content, "a");
    assert!(matches!(parent, Some(Ast::Compound { .. })));

    let (last, parent) = pairs[2];
    assert_eq!(last.content, "c");
    assert!(matches!(parent, Some(Ast::Complex { .. })));

    let single = self::ast("#x");
    assert!(single.flatten()[0].1.is_none());
}

#[test]
fn test_walk_visits_every_token_once() {
    let ast = ast("a, b > c.d, :not(e)");
    let mut seen = Vec::new();
    ast.walk(|token, _| seen.push(token.content.clone()));
    assert_eq!(seen, vec!["a", "b", "c", ".d", ":not(e)"]);
}

#[test]
fn test_stringify() {
    assert_eq!(stringify(&ast("a   >  b  c")), "a>b c");
    assert_eq!(stringify(&ast("a , b.c")), "a,b.c");
    assert_eq!(
        stringify(&ast(r#"[title="x, y"]:not(.a , .b)"#)),
        r#"[title="x, y"]:not(.a , .b)"#
    );

    let tokens = tokenize("a , b > c").unwrap().unwrap();
    assert_eq!(stringify_tokens(&tokens), "a,b>c");
}

#[test]
fn test_json_shape() {
    let json = serde_json::to_value(ast("a > .b")).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "type": "complex",
            "combinator": ">",
            "left": { "type": "type", "name": "a", "content": "a", "pos": [0, 1] },
            "right": { "type": "class", "name": "b", "content": ".b", "pos": [4, 6] },
        })
    );
}
