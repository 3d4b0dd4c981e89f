//! The method driver: walks a source method's instruction stream through the
//! converter table and installs the result in the module.

use neojc_class::{ClassPath, Insn};

use crate::converters;
use crate::error::{CompileError, Result, Unresolved};
use crate::instruction::Label;
use crate::method::{NeoMethod, SourceMethod, target_name};
use crate::module::{MethodId, NeoModule};
use crate::unit::{CompilationUnit, CompileOptions};

impl CompilationUnit {
    /// Compile `source` unless it is already registered, and return its id.
    ///
    /// The method is registered before its body is converted, so recursive
    /// calls resolve to the same id. If conversion fails the method stays
    /// registered with no instructions.
    pub fn compile_method(&mut self, source: SourceMethod) -> Result<MethodId> {
        let key = source.key();
        if let Some(id) = self.module.method_id(&key) {
            return Ok(id);
        }
        let id = self.module.reserve(key, &target_name(&source.node().name));
        let mut method = NeoMethod::new(id, source.clone())?;
        log::debug!("converting {} as #{}", method.display_name(), id.index());

        let mut index = 0;
        while index < source.insns().len() {
            index = self.handle_insn(&source, index, &mut method)? + 1;
        }
        method.insert_try_instructions()?;
        log::debug!(
            "converted {} into {} instructions",
            method.display_name(),
            method.len()
        );
        self.module.install(method);
        Ok(id)
    }

    /// Convert the source instruction at `index` into `method`. Returns the
    /// index of the last source instruction consumed.
    pub(crate) fn handle_insn(
        &mut self,
        source: &SourceMethod,
        index: usize,
        method: &mut NeoMethod,
    ) -> Result<usize> {
        let insn = source.insn(index).ok_or_else(|| CompileError::MalformedInput {
            method: method.display_name(),
            detail: format!("instruction index {index} out of range"),
        })?;
        match insn {
            Insn::Label { label } => {
                method.set_current_label(Label::Source(*label));
                Ok(index)
            }
            Insn::Line { line } => {
                method.set_line(*line);
                Ok(index)
            }
            _ => {
                let opcode = insn.opcode().ok_or_else(|| converters::malformed(insn, method))?;
                let converter = converters::get(opcode).ok_or_else(|| converters::unsupported(opcode, method))?;
                log::trace!("{} #{index}: {opcode}", method.display_name());
                converter.convert(source, index, method, self)
            }
        }
    }
}

/// Compile a contract class: its static initializer, if any, and every
/// public static method in declaration order, with everything they call.
pub fn compile_class(
    class_path: Box<dyn ClassPath>,
    class_name: &str,
    options: CompileOptions,
) -> Result<NeoModule> {
    let mut unit = CompilationUnit::new(class_path, options);
    let class = unit.load_class(class_name)?;
    let entries = class
        .methods
        .iter()
        .enumerate()
        .filter(|(_, m)| m.name == "<clinit>" || (m.is_static() && m.is_public() && !m.is_constructor()));
    for (index, _) in entries {
        unit.compile_method(SourceMethod::new(class.clone(), index))?;
    }
    if unit.module.method_count() == 0 {
        log::warn!("{class_name} has no public static methods");
    }
    Ok(unit.module)
}

/// Compile a single method and everything it calls.
pub fn compile_entry(
    class_path: Box<dyn ClassPath>,
    owner: &str,
    name: &str,
    desc: &str,
    options: CompileOptions,
) -> Result<NeoModule> {
    let mut unit = CompilationUnit::new(class_path, options);
    let class = unit.load_class(owner)?;
    let index = class.method_index(name, desc).ok_or_else(|| Unresolved::Method {
        owner: owner.to_string(),
        name: name.to_string(),
        desc: desc.to_string(),
    })?;
    unit.compile_method(SourceMethod::new(class, index))?;
    Ok(unit.module)
}
