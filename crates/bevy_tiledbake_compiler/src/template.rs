//! Object template resolution.
//!
//! An object that references a template inherits every field it leaves unset
//! from the template's object. Templates may themselves reference templates;
//! the chain is resolved depth-first so the nearest definition wins.

use crate::error::CompileError;
use crate::model::MapObject;

/// Fetches template objects by reference.
///
/// Implementations load and parse the `.tx` file behind `reference` and
/// return its object unresolved (its own `template` reference intact). They
/// are also expected to register the file as a build dependency.
pub trait TemplateSource {
    fn fetch_template(&mut self, reference: &str) -> Result<MapObject, CompileError>;
}

impl<F> TemplateSource for F
where
    F: FnMut(&str) -> Result<MapObject, CompileError>,
{
    fn fetch_template(&mut self, reference: &str) -> Result<MapObject, CompileError> {
        self(reference)
    }
}

/// Resolve `object` against its template chain, in place.
///
/// Objects without a template reference are left untouched. Resolving an
/// already resolved object again changes nothing.
///
/// # Errors
///
/// Returns [`CompileError::TemplateCycle`] if a template reappears in its own
/// chain, and forwards any error from `source`.
pub fn resolve_object(
    object: &mut MapObject,
    source: &mut impl TemplateSource,
) -> Result<(), CompileError> {
    let mut chain = Vec::new();
    resolve_chain(object, source, &mut chain)
}

fn resolve_chain(
    object: &mut MapObject,
    source: &mut impl TemplateSource,
    chain: &mut Vec<String>,
) -> Result<(), CompileError> {
    let Some(reference) = object.template.clone() else {
        return Ok(());
    };

    if chain.contains(&reference) {
        let mut cycle = chain.clone();
        cycle.push(reference);
        return Err(CompileError::TemplateCycle { chain: cycle });
    }

    let mut template = source.fetch_template(&reference)?;
    chain.push(reference);
    resolve_chain(&mut template, source, chain)?;
    chain.pop();

    object.inherit(&template);
    Ok(())
}
