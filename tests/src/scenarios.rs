use ere_registry::*;

fn offsets(
    registry: &Registry,
    handle: Handle,
    input: &str,
) -> Option<Vec<(isize, isize)>> {
    registry
        .exec(handle, input.as_bytes(), ExecFlags::empty())
        .expect("exec should not error")
        .map(|captures| captures.to_offsets())
}

#[test]
fn should_report_last_iteration_of_repeated_group() {
    let registry = Registry::new();
    let (handle, nsub) = registry
        .compile("a(b)*c", CompileFlags::EXTENDED)
        .expect("pattern should compile");

    assert_eq!(1, nsub);
    assert_eq!(Some(vec![(0, 5), (3, 4)]), offsets(&registry, handle, "abbbc"));
}

#[test]
fn should_honor_string_anchors() {
    let registry = Registry::new();
    let (handle, nsub) = registry
        .compile("^abc$", CompileFlags::EXTENDED)
        .expect("pattern should compile");

    assert_eq!(0, nsub);
    assert_eq!(Some(vec![(0, 3)]), offsets(&registry, handle, "abc"));
    assert_eq!(None, offsets(&registry, handle, "xabc"));
}

#[test]
fn should_find_leftmost_bracket_run() {
    let registry = Registry::new();
    let (handle, _) = registry
        .compile("[0-9]+", CompileFlags::EXTENDED)
        .expect("pattern should compile");

    assert_eq!(Some(vec![(2, 4)]), offsets(&registry, handle, "id42x"));
}

#[test]
fn should_bound_greedy_interval() {
    let registry = Registry::new();
    let (handle, _) = registry
        .compile("a{2,3}", CompileFlags::EXTENDED)
        .expect("pattern should compile");

    assert_eq!(Some(vec![(0, 3)]), offsets(&registry, handle, "aaaa"));
}

#[test]
fn should_reject_unbalanced_group_with_position() {
    let registry = Registry::new();

    assert_eq!(
        Err(RegistryError::Pattern(PatternError::new(
            PatternErrorKind::UnbalancedParenthesis,
            1
        ))),
        registry.compile("(", CompileFlags::EXTENDED)
    );
}

#[test]
fn should_match_second_alternative() {
    let registry = Registry::new();
    let (handle, _) = registry
        .compile("a|b", CompileFlags::EXTENDED)
        .expect("pattern should compile");

    assert_eq!(Some(vec![(0, 1)]), offsets(&registry, handle, "b"));
}

#[test]
fn should_invalidate_handles_after_release() {
    let registry = Registry::new();
    let (handle, _) = registry
        .compile("a|b", CompileFlags::EXTENDED)
        .expect("pattern should compile");

    registry.release(handle).expect("release should succeed");

    assert_eq!(
        Err(RegistryError::InvalidHandle(handle)),
        registry.exec(handle, b"a", ExecFlags::empty())
    );
}
