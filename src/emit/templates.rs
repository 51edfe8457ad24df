use askama::Template;

use super::decl::{ClassDecl, ConstructorDecl, Decoration, DecorationValue, MethodDecl};
use crate::introspect::TypeRef;

/// Renders a declaration tree into the output artifact
///
/// The generator only builds [`ClassDecl`]s; an emitter owns the physical
/// format.
pub trait Emitter {
    /// Render one generated class
    ///
    /// # Errors
    ///
    /// Returns an error if the template fails to render.
    fn render(&self, class: &ClassDecl) -> anyhow::Result<String>;
}

/// Emits Rust source with decorations spelled as attributes
#[derive(Debug, Clone)]
pub struct RustSourceEmitter {
    /// Shown in the generated header
    source_label: String,
}

impl RustSourceEmitter {
    pub fn new(source_label: impl Into<String>) -> Self {
        RustSourceEmitter {
            source_label: source_label.into(),
        }
    }
}

/// Constructor as shown in the service template
#[derive(Debug, Clone)]
pub struct ConstructorView {
    pub name: String,
    /// Rendered parameter list
    pub params: String,
    /// Rendered argument list forwarded to the implementation
    pub args: String,
}

/// Method as shown in the service template
#[derive(Debug, Clone)]
pub struct MethodView {
    pub name: String,
    pub decorations: Vec<String>,
    /// Rendered parameter list, each entry prefixed with `, `
    pub params: String,
    pub return_type: String,
    pub body: String,
}

/// Template data for one generated service file
#[derive(Template)]
#[template(path = "service.rs.txt", escape = "none")]
pub struct ServiceTemplateData {
    pub source: String,
    pub name: String,
    pub inner: String,
    pub decorations: Vec<String>,
    pub constructors: Vec<ConstructorView>,
    pub methods: Vec<MethodView>,
}

/// Template data for generating mod.rs module declarations
#[derive(Template)]
#[template(path = "mod.rs.txt", escape = "none")]
pub struct ModRsTemplateData {
    /// Module names to declare
    pub modules: Vec<String>,
}

/// Spell a type for Rust output
///
/// Wildcards have no Rust counterpart and are left to inference (`_`);
/// dotted paths become `::` paths.
pub fn rust_type(ty: &TypeRef) -> String {
    match ty {
        TypeRef::Unit => "()".to_string(),
        TypeRef::Wildcard => "_".to_string(),
        TypeRef::Named { name, args } => {
            let name = name.replace('.', "::");
            if args.is_empty() {
                name
            } else {
                let args = args.iter().map(rust_type).collect::<Vec<_>>().join(", ");
                format!("{name}<{args}>")
            }
        }
    }
}

/// Spell a decoration as an outer attribute
pub fn render_decoration(decoration: &Decoration) -> String {
    if decoration.params.is_empty() {
        return format!("#[{}]", decoration.name);
    }
    let params = decoration
        .params
        .iter()
        .map(|(key, value)| match value {
            DecorationValue::Str(s) => format!("{key} = {s:?}"),
            DecorationValue::List(items) => format!(
                "{key} = [{}]",
                items
                    .iter()
                    .map(|i| format!("{i:?}"))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!("#[{}({params})]", decoration.name)
}

fn constructor_view(ctor: &ConstructorDecl) -> ConstructorView {
    ConstructorView {
        name: ctor.name.clone(),
        params: ctor
            .params
            .iter()
            .map(|p| format!("{}: {}", p.ident, rust_type(&p.ty)))
            .collect::<Vec<_>>()
            .join(", "),
        args: ctor
            .params
            .iter()
            .map(|p| p.ident.clone())
            .collect::<Vec<_>>()
            .join(", "),
    }
}

fn method_view(method: &MethodDecl) -> MethodView {
    let params = method
        .params
        .iter()
        .map(|p| {
            format!(
                ", {} {}: {}",
                render_decoration(&p.binding),
                p.ident,
                rust_type(&p.ty)
            )
        })
        .collect::<String>();
    let body = method
        .calls
        .iter()
        .fold("self.inner".to_string(), |receiver, call| {
            format!("{receiver}.{}({})", call.method, call.args.join(", "))
        });
    MethodView {
        name: method.name.clone(),
        decorations: method.decorations.iter().map(render_decoration).collect(),
        params,
        return_type: rust_type(&method.return_type),
        body,
    }
}

impl Emitter for RustSourceEmitter {
    fn render(&self, class: &ClassDecl) -> anyhow::Result<String> {
        let rendered = ServiceTemplateData {
            source: self.source_label.clone(),
            name: class.name.clone(),
            inner: class.inner.clone(),
            decorations: class.decorations.iter().map(render_decoration).collect(),
            constructors: class.constructors.iter().map(constructor_view).collect(),
            methods: class.methods.iter().map(method_view).collect(),
        }
        .render()?;
        Ok(rendered)
    }
}

/// Render the `mod.rs` declaring every generated module
pub fn render_mod_rs(modules: &[String]) -> anyhow::Result<String> {
    Ok(ModRsTemplateData {
        modules: modules.to_vec(),
    }
    .render()?)
}
