//! Canonical folded stack keys.
//!
//! A folded key encodes one full call stack as semicolon-joined frames from
//! the outermost caller down to the allocation site, ending with the
//! allocated type: "java;com/foo/Outer:.caller;com/foo/Inner:.site;int".
//!
//! Two events with structurally identical stacks and allocated type must
//! produce byte-identical keys - the key is the aggregation identity.

use crate::source::Frame;
use crate::utils::config::STACK_ROOT_TAG;
use crate::utils::error::KeyError;

/// Translate a JVM type descriptor into a human-readable type name
///
/// **Public** - used for the allocated-type tail of every key
///
/// Leading `[` markers become one `[]` suffix each; single-letter primitive
/// codes map to their primitive names; an `L` marker yields the remainder of
/// the descriptor (minus the trailing `;`). Any other leading character
/// returns the remainder unchanged, which makes `translate` idempotent on
/// names that are already plain.
///
/// # Errors
/// * `KeyError::EmptyDescriptor` - empty input, or nothing after the array markers
pub fn translate(descriptor: &str) -> Result<String, KeyError> {
    let stripped = descriptor.trim_start_matches('[');
    let array_depth = descriptor.len() - stripped.len();

    let mut chars = stripped.chars();
    let marker = chars.next().ok_or(KeyError::EmptyDescriptor)?;

    let mut name = String::with_capacity(stripped.len() + array_depth * 2);
    match marker {
        'Z' => name.push_str("boolean"),
        'B' => name.push_str("byte"),
        'C' => name.push_str("char"),
        'D' => name.push_str("double"),
        'F' => name.push_str("float"),
        'I' => name.push_str("int"),
        'J' => name.push_str("long"),
        'S' => name.push_str("short"),
        'L' => {
            let rest = chars.as_str();
            name.push_str(rest.strip_suffix(';').unwrap_or(rest));
        }
        _ => name.push_str(stripped),
    }

    for _ in 0..array_depth {
        name.push_str("[]");
    }

    Ok(name)
}

/// Build the canonical folded stack key for one allocation
///
/// **Public** - main entry point for key construction
///
/// # Arguments
/// * `frames` - captured call stack, innermost (allocation site) frame first
/// * `object_class` - descriptor of the allocated object's type
///
/// # Returns
/// The folded key, walking the stack from the outermost caller to the
/// allocation site. Capture order is leaf-first, so frames are appended in
/// reverse; flamegraph tools expect root-to-leaf stacks and the reversal is
/// load-bearing, not cosmetic.
///
/// # Errors
/// * `KeyError::EmptyStack` - no frames (dropped upstream, but never assumed)
/// * `KeyError::EmptyDescriptor` - unusable `object_class`
pub fn build_key(frames: &[Frame], object_class: &str) -> Result<String, KeyError> {
    if frames.is_empty() {
        return Err(KeyError::EmptyStack);
    }

    let mut key = String::with_capacity(STACK_ROOT_TAG.len() + frames.len() * 32);
    key.push_str(STACK_ROOT_TAG);

    for frame in frames.iter().rev() {
        for c in frame.declaring_type.chars() {
            key.push(if c == '.' { '/' } else { c });
        }
        key.push_str(":.");
        key.push_str(&frame.method);
        key.push(';');
    }

    key.push_str(&translate(object_class)?);

    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(declaring_type: &str, method: &str) -> Frame {
        Frame {
            declaring_type: declaring_type.to_string(),
            method: method.to_string(),
        }
    }

    #[test]
    fn test_translate_primitives() {
        assert_eq!(translate("Z").unwrap(), "boolean");
        assert_eq!(translate("B").unwrap(), "byte");
        assert_eq!(translate("C").unwrap(), "char");
        assert_eq!(translate("D").unwrap(), "double");
        assert_eq!(translate("F").unwrap(), "float");
        assert_eq!(translate("I").unwrap(), "int");
        assert_eq!(translate("J").unwrap(), "long");
        assert_eq!(translate("S").unwrap(), "short");
    }

    #[test]
    fn test_translate_reference_arrays() {
        assert_eq!(
            translate("[[Ljava.lang.String;").unwrap(),
            "java.lang.String[][]"
        );
        assert_eq!(translate("[I").unwrap(), "int[]");
    }

    #[test]
    fn test_translate_idempotent_on_plain_names() {
        assert_eq!(translate("int").unwrap(), "int");
        assert_eq!(translate("com.foo.Bar").unwrap(), "com.foo.Bar");
    }

    #[test]
    fn test_translate_rejects_empty_input() {
        assert_eq!(translate(""), Err(KeyError::EmptyDescriptor));
        // Array markers with nothing behind them are just as unusable
        assert_eq!(translate("[["), Err(KeyError::EmptyDescriptor));
    }

    #[test]
    fn test_build_key_reverses_capture_order() {
        // Captured leaf-first: C.c allocated, called from B.b, called from A.a
        let frames = vec![frame("C", "c"), frame("B", "b"), frame("A", "a")];

        let key = build_key(&frames, "I").unwrap();
        assert_eq!(key, "java;A:.a;B:.b;C:.c;int");
    }

    #[test]
    fn test_build_key_replaces_dots_in_declaring_types() {
        let frames = vec![frame("com.foo.Bar", "baz")];

        let key = build_key(&frames, "[[Ljava.lang.String;").unwrap();
        // Dots survive in the translated type tail, only frames get slashes
        assert_eq!(key, "java;com/foo/Bar:.baz;java.lang.String[][]");
    }

    #[test]
    fn test_build_key_rejects_empty_stack() {
        assert_eq!(build_key(&[], "I"), Err(KeyError::EmptyStack));
    }

    #[test]
    fn test_identical_stacks_produce_identical_keys() {
        let frames = vec![frame("com.foo.Bar", "baz"), frame("com.foo.Main", "main")];

        let first = build_key(&frames, "J").unwrap();
        let second = build_key(&frames, "J").unwrap();
        assert_eq!(first, second);
    }
}
