//! The stable ABI of the precompiled runtime archive.
//!
//! The runtime itself — garbage-collected object allocation, array
//! primitives, math helpers — is an external collaborator, out of scope
//! here: linked in from a precompiled archive, never reimplemented in
//! this crate. This crate owns only the *contract*: mangled extern names
//! and signatures, so `glint_codegen`'s Module Assembler can declare
//! them without reaching into a real runtime implementation.

use glint_types::Type;

/// One runtime-provided extern function: its stable mangled name and
/// signature. `ret: None` means the extern returns `void`.
#[derive(Clone, Debug)]
pub struct RuntimeExtern {
    pub name: &'static str,
    pub params: &'static [Type],
    pub ret: Option<Type>,
}

macro_rules! rt_extern {
    ($name:literal, [$($param:expr),*], $ret:expr) => {
        RuntimeExtern {
            name: $name,
            params: &[$($param),*],
            ret: $ret,
        }
    };
}

/// All runtime externs the code generator may reference. First reference
/// to a given name wins identity; declaring the same name with an
/// incompatible signature elsewhere is `ExternSignatureConflict`,
/// enforced by `glint_codegen`'s extern table, not here.
#[must_use]
pub fn all() -> Vec<RuntimeExtern> {
    vec![
        // -- object / array allocation --
        rt_extern!("glint_rt_object_alloc", [Type::Int32], Some(Type::Object)),
        rt_extern!(
            "glint_rt_array_alloc",
            [Type::Int32, Type::Int32],
            Some(Type::Array(Box::new(Type::Int32)))
        ),
        rt_extern!(
            "glint_rt_array_get_i32",
            [Type::Array(Box::new(Type::Int32)), Type::Int32],
            Some(Type::Int32)
        ),
        rt_extern!(
            "glint_rt_array_set_i32",
            [Type::Array(Box::new(Type::Int32)), Type::Int32, Type::Int32],
            None
        ),
        rt_extern!(
            "glint_rt_array_get_f64",
            [Type::Array(Box::new(Type::Float64)), Type::Int32],
            Some(Type::Float64)
        ),
        rt_extern!(
            "glint_rt_array_set_f64",
            [Type::Array(Box::new(Type::Float64)), Type::Int32, Type::Float64],
            None
        ),
        rt_extern!(
            "glint_rt_array_len",
            [Type::Array(Box::new(Type::Int32))],
            Some(Type::Int32)
        ),
        // -- strings --
        rt_extern!("glint_rt_string_new", [Type::Int32, Type::Int32], Some(Type::Object)),
        // -- math helpers not expressible as primitive SSA ops --
        rt_extern!("glint_rt_math_pow", [Type::Float64, Type::Float64], Some(Type::Float64)),
        rt_extern!("glint_rt_math_sqrt", [Type::Float64], Some(Type::Float64)),
        rt_extern!("glint_rt_math_floor", [Type::Float64], Some(Type::Float64)),
        // -- object construction --
        rt_extern!("glint_rt_new_object", [Type::Int32], Some(Type::Object)),
        // -- traps --
        rt_extern!("glint_rt_trap_div_by_zero", [], None),
        rt_extern!("glint_rt_trap_bounds", [Type::Int32, Type::Int32], None),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_unique() {
        let externs = all();
        let mut names: Vec<&str> = externs.iter().map(|e| e.name).collect();
        names.sort_unstable();
        let mut deduped = names.clone();
        deduped.dedup();
        assert_eq!(names.len(), deduped.len(), "duplicate runtime extern name");
    }
}
