//! Thompson-construction compiler (spec §4.C): walks the [`Ast`] bottom-up,
//! emitting one [`NfaState`] at a time and backpatching dangling "out"
//! edges once the state they point to is known — the classic
//! fragment-with-patch-list shape (here generalised from the split/concat
//! handling pattern in `defuz-regex`'s compiler, adapted to this crate's
//! explicit index-based state array instead of pointer-linked nodes).

use crate::regex::nfa::{ClassBitmap, NfaState, Op, Program};
use crate::regex::syntax::{self, Ast, ParseError};

/// A dangling output edge of a not-yet-complete fragment: "slot `which` of
/// state `state_idx` needs to be patched to the next fragment's start."
#[derive(Clone, Copy)]
struct Patch {
    state_idx: u32,
    which: Slot,
}

#[derive(Clone, Copy)]
enum Slot {
    A,
    B,
}

/// A partially built piece of the program: its entry point plus the list
/// of edges still waiting to be wired to whatever comes next.
struct Frag {
    start: u32,
    dangling: Vec<Patch>,
}

struct Compiler {
    states: Vec<NfaState>,
    classes: Vec<ClassBitmap>,
    case_insensitive: bool,
    num_groups: u32,
}

impl Compiler {
    fn push(&mut self, state: NfaState) -> u32 {
        self.states.push(state);
        (self.states.len() - 1) as u32
    }

    fn patch(&mut self, patches: &[Patch], target: u32) {
        for p in patches {
            let state = &mut self.states[p.state_idx as usize];
            match p.which {
                Slot::A => state.a = target,
                Slot::B => state.b = target,
            }
        }
    }

    fn intern_class(&mut self, class: ClassBitmap) -> u32 {
        if let Some(idx) = self.classes.iter().position(|c| *c == class) {
            return idx as u32;
        }
        self.classes.push(class);
        (self.classes.len() - 1) as u32
    }

    fn compile_byte_class(&mut self, mut class: ClassBitmap) -> Frag {
        if self.case_insensitive {
            fold_case_insensitive(&mut class);
        }
        let class_id = self.intern_class(class);
        let idx = self.push(NfaState::byte(class_id, 0));
        Frag { start: idx, dangling: vec![Patch { state_idx: idx, which: Slot::B }] }
    }

    fn compile(&mut self, ast: &Ast) -> Frag {
        match ast {
            Ast::Empty => {
                let idx = self.push(NfaState::jmp(0));
                Frag { start: idx, dangling: vec![Patch { state_idx: idx, which: Slot::A }] }
            }
            Ast::Literal(b) => {
                let mut class: ClassBitmap = [0; 8];
                crate::regex::nfa::class_insert(&mut class, *b);
                self.compile_byte_class(class)
            }
            Ast::AnyByte => self.compile_byte_class([u32::MAX; 8]),
            Ast::Class(class) => self.compile_byte_class(*class),
            Ast::StartAnchor => {
                let idx = self.push(NfaState::assert_start(0));
                Frag { start: idx, dangling: vec![Patch { state_idx: idx, which: Slot::A }] }
            }
            Ast::EndAnchor => {
                let idx = self.push(NfaState::assert_end(0));
                Frag { start: idx, dangling: vec![Patch { state_idx: idx, which: Slot::A }] }
            }
            Ast::Concat(parts) => self.compile_concat(parts),
            Ast::Alternate(branches) => self.compile_alternate(branches),
            Ast::Star(inner) => self.compile_star(inner),
            Ast::Plus(inner) => self.compile_plus(inner),
            Ast::Question(inner) => self.compile_question(inner),
            Ast::Group(idx, inner) => self.compile_group(*idx, inner),
            Ast::WordBoundary { negate } => self.compile_word_boundary(*negate),
        }
    }

    /// `(e)`: zero-width `GroupStart`/`GroupEnd` bracketing `e`'s fragment,
    /// tagged with this group's 1-based index. Transparent to matching —
    /// present purely so the shared NFA layout carries group structure for
    /// any consumer that wants it (spec §3); this engine's own operations
    /// never read the tag back out.
    fn compile_group(&mut self, index: u32, inner: &Ast) -> Frag {
        self.num_groups = self.num_groups.max(index);
        let start_idx = self.push(NfaState::group_start(0, index));
        let frag = self.compile(inner);
        self.states[start_idx as usize].a = frag.start;
        let end_idx = self.push(NfaState::group_end(0, index));
        self.patch(&frag.dangling, end_idx);
        Frag { start: start_idx, dangling: vec![Patch { state_idx: end_idx, which: Slot::A }] }
    }

    fn compile_word_boundary(&mut self, negate: bool) -> Frag {
        let idx = self.push(if negate {
            NfaState::assert_not_word_boundary(0)
        } else {
            NfaState::assert_word_boundary(0)
        });
        Frag { start: idx, dangling: vec![Patch { state_idx: idx, which: Slot::A }] }
    }

    fn compile_concat(&mut self, parts: &[Ast]) -> Frag {
        let mut iter = parts.iter();
        let mut frag = self.compile(iter.next().expect("Concat is never empty"));
        for part in iter {
            let next = self.compile(part);
            self.patch(&frag.dangling, next.start);
            frag = Frag { start: frag.start, dangling: next.dangling };
        }
        frag
    }

    fn compile_alternate(&mut self, branches: &[Ast]) -> Frag {
        debug_assert!(branches.len() >= 2);
        let mut rev = branches.iter().rev();
        let last = self.compile(rev.next().unwrap());
        let mut acc_start = last.start;
        let mut dangling = last.dangling;

        for branch in rev {
            let frag = self.compile(branch);
            let split_idx = self.push(NfaState::split(frag.start, acc_start));
            dangling.extend(frag.dangling);
            acc_start = split_idx;
        }
        Frag { start: acc_start, dangling }
    }

    /// `e*`: `split(e, out)` before `e`, `e`'s out looping back to the split.
    fn compile_star(&mut self, inner: &Ast) -> Frag {
        let split_idx = self.push(NfaState::split(0, 0));
        let frag = self.compile(inner);
        self.states[split_idx as usize].a = frag.start;
        self.patch(&frag.dangling, split_idx);
        Frag { start: split_idx, dangling: vec![Patch { state_idx: split_idx, which: Slot::B }] }
    }

    /// `e+`: `e` once, then a split back into `e` or out — greedy, so the
    /// loop branch (`a`) is explored before the exit branch (`b`); the
    /// executor's leftmost-longest candidate selection (spec §9, Open
    /// Question ii) picks whichever path actually reaches `Match` furthest.
    fn compile_plus(&mut self, inner: &Ast) -> Frag {
        let frag = self.compile(inner);
        let split_idx = self.push(NfaState::split(frag.start, 0));
        self.patch(&frag.dangling, split_idx);
        Frag { start: frag.start, dangling: vec![Patch { state_idx: split_idx, which: Slot::B }] }
    }

    /// `e?`: `split(e, out)`.
    fn compile_question(&mut self, inner: &Ast) -> Frag {
        let frag = self.compile(inner);
        let split_idx = self.push(NfaState::split(frag.start, 0));
        let mut dangling = frag.dangling;
        dangling.push(Patch { state_idx: split_idx, which: Slot::B });
        Frag { start: split_idx, dangling }
    }
}

/// Add the other ASCII case of every letter byte set in `class`, so a
/// case-insensitive compile matches either case without lowering the
/// haystack (mirrors [`crate::literal::LiteralMatcher`]'s dual-case skip
/// table, but applied to a bitmap rather than a skip distance).
fn fold_case_insensitive(class: &mut ClassBitmap) {
    for b in b'a'..=b'z' {
        if crate::regex::nfa::class_contains(class, b) {
            crate::regex::nfa::class_insert(class, b.to_ascii_uppercase());
        }
    }
    for b in b'A'..=b'Z' {
        if crate::regex::nfa::class_contains(class, b) {
            crate::regex::nfa::class_insert(class, b.to_ascii_lowercase());
        }
    }
}

/// Parse and compile `pattern` into a ready-to-execute [`Program`].
pub fn compile(pattern: &[u8], case_insensitive: bool) -> Result<Program, ParseError> {
    let ast = syntax::parse(pattern)?;
    let anchored_start = starts_with_anchor(&ast);
    let anchored_end = ends_with_anchor(&ast);

    let mut compiler = Compiler { states: Vec::new(), classes: Vec::new(), case_insensitive, num_groups: 0 };
    let frag = compiler.compile(&ast);
    let match_idx = compiler.push(NfaState::matching());
    compiler.patch(&frag.dangling, match_idx);

    Ok(Program {
        states: compiler.states,
        classes: compiler.classes,
        start: frag.start,
        anchored_start,
        anchored_end,
        case_insensitive,
        num_groups: compiler.num_groups,
    })
}

/// True iff every leftmost path through `ast` begins with `^`, letting the
/// executor skip the unanchored per-position restart loop.
fn starts_with_anchor(ast: &Ast) -> bool {
    match ast {
        Ast::StartAnchor => true,
        Ast::Concat(parts) => parts.first().is_some_and(starts_with_anchor),
        Ast::Alternate(branches) => branches.iter().all(starts_with_anchor),
        Ast::Group(_, inner) => starts_with_anchor(inner),
        _ => false,
    }
}

/// True iff every rightmost path through `ast` ends with `$` (header flag
/// only — the executor doesn't special-case it today, since `AssertEnd`
/// already prunes non-matching threads without a separate fast path).
fn ends_with_anchor(ast: &Ast) -> bool {
    match ast {
        Ast::EndAnchor => true,
        Ast::Concat(parts) => parts.last().is_some_and(ends_with_anchor),
        Ast::Alternate(branches) => branches.iter().all(ends_with_anchor),
        Ast::Group(_, inner) => ends_with_anchor(inner),
        _ => false,
    }
}
