//! Integration tests for specificity calculation.

use pretty_assertions::assert_eq;
use sieve_selector::{ParseOptions, SelectorError, Specificity, parse, specificity};

fn score(selector: &str) -> Specificity {
    specificity(selector).unwrap().unwrap()
}

#[test]
fn test_absent_selector() {
    assert_eq!(specificity(None::<&str>).unwrap(), None);
}

#[test]
fn test_simple_selectors() {
    assert_eq!(score("*"), Specificity(0, 0, 0));
    assert_eq!(score("div"), Specificity(0, 0, 1));
    assert_eq!(score("#a"), Specificity(1, 0, 0));
    assert_eq!(score(".a"), Specificity(0, 1, 0));
    assert_eq!(score("[href]"), Specificity(0, 1, 0));
    assert_eq!(score(":hover"), Specificity(0, 1, 0));
    assert_eq!(score("::before"), Specificity(0, 0, 1));
}

#[test]
fn test_compound_and_complex_selectors() {
    assert_eq!(score(".a.b"), Specificity(0, 2, 0));
    assert_eq!(score("div::before"), Specificity(0, 0, 2));
    assert_eq!(score("ul li.item > a:hover"), Specificity(0, 2, 3));
    assert_eq!(
        score("#foo > .bar + div.k1.k2 [id='baz']:hello(2):not(:where(#yolo))::before"),
        Specificity(1, 5, 2)
    );
}

#[test]
fn test_where_is_zero() {
    assert_eq!(score(":where(#a)"), Specificity(0, 0, 0));
    assert_eq!(score("a:where(#b .c)"), Specificity(0, 0, 1));
}

#[test]
fn test_is_not_has_take_argument_specificity() {
    assert_eq!(score(":is(#a, .b)"), Specificity(1, 0, 0));
    assert_eq!(score(":not(.a.b)"), Specificity(0, 2, 0));
    assert_eq!(score("a:has(img.x)"), Specificity(0, 1, 2));
    assert_eq!(score(":matches(p, #q)"), Specificity(1, 0, 0));
    assert_eq!(score(":-webkit-any(.a, b)"), Specificity(0, 1, 0));
}

#[test]
fn test_has_with_relative_selector() {
    // The leading combinator leaves nothing on its left.
    assert_eq!(
        specificity(":has(> img)").unwrap_err(),
        SelectorError::EmptyConstruct
    );
}

#[test]
fn test_nth_child() {
    assert_eq!(score(":nth-child(2n of .a.b)"), Specificity(0, 3, 0));
    assert_eq!(score(":nth-last-child(odd of #a)"), Specificity(1, 1, 0));
    assert_eq!(score(":nth-child(2n+1)"), Specificity(0, 1, 0));
}

#[test]
fn test_list_takes_highest_alternative() {
    assert_eq!(score("a, .b, #c"), Specificity(1, 0, 0));
    assert_eq!(score("a b c, .d"), Specificity(0, 1, 0));
    assert_eq!(score("div, p"), Specificity(0, 0, 1));
}

#[test]
fn test_list_tie_keeps_first_alternative() {
    // On base 11, `.a.b` (0, 2, 0) and `#c` (1, 0, 0) rank equal.
    assert_eq!(score(".a.b, #c"), Specificity(0, 2, 0));
    assert_eq!(score("#c, .a.b"), Specificity(1, 0, 0));
}

#[test]
fn test_list_ranking_weighs_ids_at_twice_the_base() {
    // Eleven classes widen the base to 12: 11 * 12 outranks 1 * 2 * 12.
    let classes = ".a".repeat(11);
    assert_eq!(score(&format!("{classes}, #x")), Specificity(0, 11, 0));
    assert_eq!(score(&format!("{classes}, #x#y#z#w#v#u")), Specificity(6, 0, 0));
}

#[test]
fn test_flat_ast_scores_logical_pseudo_classes_as_classes() {
    let ast = parse(":is(#a)", ParseOptions::flat()).unwrap().unwrap();
    assert_eq!(ast.specificity(), Specificity(0, 1, 0));
}

#[test]
fn test_specificity_of_parsed_ast_matches_string() {
    let ast = parse(":not(#a) .b", ParseOptions::default()).unwrap().unwrap();
    assert_eq!(ast.specificity(), score(":not(#a) .b"));
    assert_eq!(ast.specificity(), Specificity(1, 1, 0));
}

#[test]
fn test_errors_propagate() {
    assert_eq!(specificity("").unwrap_err(), SelectorError::EmptyConstruct);
    assert!(specificity(":not(").is_err());
}
