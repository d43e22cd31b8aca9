use ere_registry::*;

fn exec_with(
    pattern: &str,
    compile_flags: CompileFlags,
    input: &str,
    exec_flags: ExecFlags,
) -> Option<Vec<(isize, isize)>> {
    let compiled = CompiledPattern::new(pattern, compile_flags).expect("pattern should compile");

    compiled
        .exec(input.as_bytes(), &ExecOptions::from(exec_flags))
        .expect("exec should not error")
        .map(|captures| captures.to_offsets())
}

fn exec_ere(pattern: &str, input: &str) -> Option<Vec<(isize, isize)>> {
    exec_with(pattern, CompileFlags::EXTENDED, input, ExecFlags::empty())
}

#[test]
fn should_prefer_leftmost_then_longest_match() {
    let input_output = vec![
        ("a|ab|abc", "xabcd", Some(vec![(1, 4)])),
        ("x*", "xxxyxx", Some(vec![(0, 3)])),
        ("y*", "xxxyxx", Some(vec![(0, 0)])),
        ("", "abc", Some(vec![(0, 0)])),
        ("(foo|foobar)baz", "foobarbaz", Some(vec![(0, 9), (0, 6)])),
        ("(a|ab)(c|bcd)", "abcd", Some(vec![(0, 4), (0, 1), (1, 4)])),
        ("b+|a+b+", "aabb", Some(vec![(0, 4)])),
        ("[[:digit:]]+", "ab12", Some(vec![(2, 4)])),
        ("a.c", "abd", None),
    ];

    for (case_id, (pattern, input, expected)) in input_output.into_iter().enumerate() {
        assert_eq!((case_id, expected), (case_id, exec_ere(pattern, input)));
    }
}

#[test]
fn should_report_unset_groups_for_untaken_paths() {
    let input_output = vec![
        ("(a)|(b)", "b", Some(vec![(0, 1), (-1, -1), (0, 1)])),
        ("(a)?b", "b", Some(vec![(0, 1), (-1, -1)])),
        ("(a)*b", "b", Some(vec![(0, 1), (-1, -1)])),
    ];

    for (case_id, (pattern, input, expected)) in input_output.into_iter().enumerate() {
        assert_eq!((case_id, expected), (case_id, exec_ere(pattern, input)));
    }
}

#[test]
fn should_keep_nested_groups_within_their_enclosing_group() {
    let input_output = vec![
        ("((a)|b)*", "ab", Some(vec![(0, 2), (1, 2), (-1, -1)])),
        ("((a)|b)*", "ba", Some(vec![(0, 2), (1, 2), (1, 2)])),
        ("((a)|(b))+", "ab", Some(vec![(0, 2), (1, 2), (-1, -1), (1, 2)])),
        ("(a(b)?)+", "aba", Some(vec![(0, 3), (2, 3), (-1, -1)])),
        // an iteration matching nothing is never taken.
        ("(a*)*", "b", Some(vec![(0, 0), (-1, -1)])),
        ("(a*)+", "b", Some(vec![(0, 0), (0, 0)])),
    ];

    for (case_id, (pattern, input, expected)) in input_output.into_iter().enumerate() {
        assert_eq!((case_id, expected), (case_id, exec_ere(pattern, input)));
    }
}

#[test]
fn should_reject_deeply_nested_patterns_with_a_position() {
    let groups = format!("{}a{}", "(".repeat(2000), ")".repeat(2000));
    let stars = format!("a{}", "*".repeat(5000));

    for (case_id, pattern) in [groups, stars].iter().enumerate() {
        assert_eq!(
            (
                case_id,
                Err(PatternError::new(PatternErrorKind::NestingTooDeep, 256))
            ),
            (
                case_id,
                CompiledPattern::new(pattern, CompileFlags::EXTENDED).map(|_| ())
            )
        );
    }

    let nested = format!("{}a{}", "(".repeat(128), ")".repeat(128));
    assert_eq!(Some(vec![(1, 2); 129]), exec_ere(&nested, "ba"));
}

#[test]
fn should_return_one_slot_per_capture_group() {
    let input_output = vec![
        ("abc", 0),
        ("(a)(b)(c)", 3),
        ("((a)|(b))", 3),
        ("(?:a)(b)", 1),
    ];

    for (case_id, (pattern, nsub)) in input_output.into_iter().enumerate() {
        let compiled =
            CompiledPattern::new(pattern, CompileFlags::EXTENDED).expect("pattern should compile");
        let captures = compiled
            .exec(b"abc", &ExecOptions::default())
            .expect("exec should not error")
            .expect("pattern should match");

        assert_eq!((case_id, nsub), (case_id, compiled.nsub()));
        assert_eq!((case_id, nsub + 1), (case_id, captures.len()));
    }
}

#[test]
fn should_return_identical_results_for_repeated_runs() {
    let compiled = CompiledPattern::new("(a|b)*(c+)", CompileFlags::EXTENDED)
        .expect("pattern should compile");
    let options = ExecOptions::default();

    let first = compiled.exec(b"xxababccc", &options);
    for _ in 0..16 {
        assert_eq!(first, compiled.exec(b"xxababccc", &options));
    }
}

#[test]
fn should_match_basic_syntax() {
    let input_output = vec![
        ("a\\{2\\}", "aaa", Some(vec![(0, 2)])),
        ("a+", "aa+", Some(vec![(1, 3)])),
        ("\\(ab\\)*c", "ababc", Some(vec![(0, 5), (2, 4)])),
        ("*a", "x*a", Some(vec![(1, 3)])),
        ("a|b", "a|b", Some(vec![(0, 3)])),
    ];

    for (case_id, (pattern, input, expected)) in input_output.into_iter().enumerate() {
        assert_eq!(
            (case_id, expected),
            (
                case_id,
                exec_with(pattern, CompileFlags::empty(), input, ExecFlags::empty())
            )
        );
    }
}

#[test]
fn should_ignore_case_when_requested() {
    let icase = CompileFlags::EXTENDED | CompileFlags::ICASE;
    let input_output = vec![
        ("abc", "xABC", Some(vec![(1, 4)])),
        ("[a-c]+", "CAB", Some(vec![(0, 3)])),
        ("[^a]", "A", None),
        ("[[:lower:]]", "Q", Some(vec![(0, 1)])),
    ];

    for (case_id, (pattern, input, expected)) in input_output.into_iter().enumerate() {
        assert_eq!(
            (case_id, expected),
            (case_id, exec_with(pattern, icase, input, ExecFlags::empty()))
        );
    }

    assert_eq!(None, exec_ere("abc", "ABC"));
}

#[test]
fn should_treat_newlines_as_line_boundaries_in_newline_mode() {
    let newline = CompileFlags::EXTENDED | CompileFlags::NEWLINE;
    let input_output = vec![
        ("^b", newline, "a\nb", Some(vec![(2, 3)])),
        ("^b", CompileFlags::EXTENDED, "a\nb", None),
        ("a$", newline, "a\nb", Some(vec![(0, 1)])),
        ("a.b", newline, "a\nb", None),
        ("a.b", CompileFlags::EXTENDED, "a\nb", Some(vec![(0, 3)])),
        ("[^x]", newline, "\n", None),
        ("[^x]+", newline, "ab\ncd", Some(vec![(0, 2)])),
    ];

    for (case_id, (pattern, flags, input, expected)) in input_output.into_iter().enumerate() {
        assert_eq!(
            (case_id, expected),
            (case_id, exec_with(pattern, flags, input, ExecFlags::empty()))
        );
    }
}

#[test]
fn should_honor_notbol_and_noteol() {
    let input_output = vec![
        ("^a", "a", ExecFlags::NOTBOL, None),
        ("a$", "a", ExecFlags::NOTEOL, None),
        ("a", "a", ExecFlags::NOTBOL | ExecFlags::NOTEOL, Some(vec![(0, 1)])),
        ("^a", "a", ExecFlags::NOTEOL, Some(vec![(0, 1)])),
    ];

    for (case_id, (pattern, input, flags, expected)) in input_output.into_iter().enumerate() {
        assert_eq!(
            (case_id, expected),
            (
                case_id,
                exec_with(pattern, CompileFlags::EXTENDED, input, flags)
            )
        );
    }
}

#[test]
fn should_report_byte_offsets_for_multibyte_input() {
    assert_eq!(Some(vec![(1, 5)]), exec_ere("é+", "aéé"));
    assert_eq!(Some(vec![(0, 3), (0, 3)]), exec_ere("([^a])", "€"));
}

#[test]
fn should_evaluate_pathological_patterns_without_backtracking() {
    let input = "a".repeat(10_000);
    assert_eq!(None, exec_ere("(a*)*b", &input));

    let pattern = format!("{}{}", "a?".repeat(24), "a".repeat(24));
    assert_eq!(Some(vec![(0, 24)]), exec_ere(&pattern, &"a".repeat(24)));
}
