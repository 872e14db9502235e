// ==============================================================================
// Coalescing: CompactTypeScheme -> OutputTy
// ==============================================================================
//
// Every compact type becomes a union (positive) or an intersection
// (negative) of its parts. Traversal is hash-consed on (hash, polarity):
// meeting a type that is still being coalesced produces a reference to a
// binder, and the outer occurrence is then wrapped as a recursive type.

use lang_ty::{OutputTy, TyRef};
use rustc_hash::FxHashMap;

use crate::{CompactType, CompactTypeScheme, TyVar, Typer};

struct Frame {
    /// Set the first time the type is re-entered.
    binder: Option<u32>,
}

#[derive(Default)]
struct Coalescer {
    in_progress: FxHashMap<String, usize>,
    frames: Vec<Frame>,
}

enum Node<'a> {
    Var(TyVar),
    Compact(&'a CompactType),
}

impl Typer {
    pub fn coalesce_compact_type(&mut self, scheme: &CompactTypeScheme) -> OutputTy {
        let mut state = Coalescer::default();
        self.coalesce_node(Node::Compact(&scheme.term), true, scheme, &mut state)
    }

    fn coalesce_node(
        &mut self,
        node: Node<'_>,
        positive: bool,
        scheme: &CompactTypeScheme,
        state: &mut Coalescer,
    ) -> OutputTy {
        let (key, own_var) = match &node {
            Node::Var(var) => (format!("{}_{positive}", var.uid()), Some(var.uid())),
            Node::Compact(ty) => (format!("{}_{positive}", ty.hash_key()), None),
        };

        if let Some(&idx) = state.in_progress.get(&key) {
            let binder = match state.frames[idx].binder {
                Some(binder) => binder,
                None => {
                    // a variable names its own recursion, anything else gets a fresh one
                    let binder = match own_var {
                        Some(uid) => uid,
                        None => self.fresh_ty_var(0).uid(),
                    };
                    state.frames[idx].binder = Some(binder);
                    binder
                }
            };
            return OutputTy::TyVar(binder);
        }

        let idx = state.frames.len();
        state.frames.push(Frame { binder: None });
        state.in_progress.insert(key.clone(), idx);

        let res = match node {
            Node::Var(var) => match scheme.rec_vars.get(&var) {
                Some(body) => self.coalesce_node(Node::Compact(body), positive, scheme, state),
                None => OutputTy::TyVar(var.uid()),
            },
            // a union absorbs everything into ⊤
            Node::Compact(ty) if ty.top => OutputTy::Top,
            Node::Compact(ty) => {
                let mut parts: Vec<OutputTy> = Vec::new();
                for var in &ty.vars {
                    parts.push(self.coalesce_node(Node::Var(*var), positive, scheme, state));
                }
                parts.extend(ty.prims.iter().map(|prim| OutputTy::Primitive(*prim)));
                if let Some(fields) = &ty.record {
                    let fields = fields
                        .iter()
                        .map(|(name, field)| {
                            let field =
                                self.coalesce_node(Node::Compact(field), positive, scheme, state);
                            (name.clone(), TyRef::from(field))
                        })
                        .collect();
                    parts.push(OutputTy::Record(fields));
                }
                if let Some(elems) = &ty.tuple {
                    let elems = elems
                        .iter()
                        .map(|elem| {
                            TyRef::from(self.coalesce_node(
                                Node::Compact(elem),
                                positive,
                                scheme,
                                state,
                            ))
                        })
                        .collect();
                    parts.push(OutputTy::Tuple(elems));
                }
                if let Some(fun) = &ty.function {
                    let param = self.coalesce_node(Node::Compact(&fun.0), !positive, scheme, state);
                    let body = self.coalesce_node(Node::Compact(&fun.1), positive, scheme, state);
                    parts.push(OutputTy::function(param, body));
                }
                merge_parts(parts, positive)
            }
        };

        state.in_progress.remove(&key);
        let frame = state.frames.pop();
        match frame.and_then(|frame| frame.binder) {
            Some(binder) => {
                log::trace!("recursive {key} as {binder}");
                OutputTy::Recursive {
                    binder,
                    body: res.into(),
                }
            }
            None => res,
        }
    }
}

fn merge_parts(mut parts: Vec<OutputTy>, positive: bool) -> OutputTy {
    match (parts.len(), positive) {
        (0, true) => OutputTy::Bottom,
        (0, false) => OutputTy::Top,
        (1, _) => parts.remove(0),
        (_, true) => OutputTy::Union(parts.into_iter().map(TyRef::from).collect()),
        (_, false) => OutputTy::Intersection(parts.into_iter().map(TyRef::from).collect()),
    }
}
