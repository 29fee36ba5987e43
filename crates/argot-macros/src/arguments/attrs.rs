//! Attribute parsing for the Arguments derive macro.
//!
//! Parses `#[args(...)]` on the struct (program level help text) and on
//! fields (kind, labels, constraints, default, converter, help).

use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    Attribute, Error, Expr, ExprLit, ExprUnary, Lit, Meta, Path, Result, Token, UnOp,
};

/// The declared kind of an argument field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Switch,
    Option,
    Verbal,
}

/// Dependency check mode: `dependency = "optional"` or `"required"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dependency {
    Optional,
    Required,
}

/// A literal default value.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultLit {
    Bool(bool),
    Integer(i128),
    Float(f64),
    Char(char),
    Text(String),
}

/// Field-level attributes from `#[args(...)]`.
#[derive(Debug, Clone, Default)]
pub struct FieldAttr {
    pub kind: Option<FieldKind>,
    pub solid: Option<String>,
    pub brief: Option<String>,
    pub separator: Option<char>,
    pub delimiter: Option<String>,
    pub required: bool,
    pub exclusive: bool,
    pub depends: Vec<String>,
    pub dependency: Option<Dependency>,
    pub default: Option<DefaultLit>,
    pub converter: Option<Path>,
    pub help: Option<String>,
    pub value_name: Option<String>,
}

fn lit_str(expr: &Expr, key: &str) -> Result<String> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Str(s), ..
        }) => Ok(s.value()),
        _ => Err(Error::new(
            expr.span(),
            format!("{key} must be a string literal"),
        )),
    }
}

fn lit_char(expr: &Expr) -> Result<char> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Char(c), ..
        }) => Ok(c.value()),
        Expr::Lit(ExprLit {
            lit: Lit::Str(s), ..
        }) => {
            let value = s.value();
            let mut chars = value.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(c),
                _ => Err(Error::new(
                    s.span(),
                    "separator must be a single character",
                )),
            }
        }
        _ => Err(Error::new(
            expr.span(),
            "separator must be a char literal, e.g. ':'",
        )),
    }
}

fn lit_names(expr: &Expr) -> Result<Vec<String>> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Str(s), ..
        }) => Ok(s
            .value()
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect()),
        Expr::Array(array) => array
            .elems
            .iter()
            .map(|elem| lit_str(elem, "depends entry"))
            .collect(),
        _ => Err(Error::new(
            expr.span(),
            "depends must be a string like \"a, b\" or an array of strings",
        )),
    }
}

fn lit_default(expr: &Expr) -> Result<DefaultLit> {
    match expr {
        Expr::Lit(ExprLit { lit, .. }) => match lit {
            Lit::Bool(b) => Ok(DefaultLit::Bool(b.value)),
            Lit::Int(i) => Ok(DefaultLit::Integer(i.base10_parse::<i128>()?)),
            Lit::Float(f) => Ok(DefaultLit::Float(f.base10_parse::<f64>()?)),
            Lit::Char(c) => Ok(DefaultLit::Char(c.value())),
            Lit::Str(s) => Ok(DefaultLit::Text(s.value())),
            other => Err(Error::new(other.span(), "unsupported default literal")),
        },
        Expr::Unary(ExprUnary {
            op: UnOp::Neg(_),
            expr: inner,
            ..
        }) => match lit_default(inner)? {
            DefaultLit::Integer(i) => Ok(DefaultLit::Integer(-i)),
            DefaultLit::Float(f) => Ok(DefaultLit::Float(-f)),
            _ => Err(Error::new(inner.span(), "only numbers can be negated")),
        },
        _ => Err(Error::new(expr.span(), "default must be a literal")),
    }
}

impl Parse for FieldAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = FieldAttr::default();

        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                Meta::Path(p) => {
                    let kind = if p.is_ident("switch") {
                        Some(FieldKind::Switch)
                    } else if p.is_ident("option") {
                        Some(FieldKind::Option)
                    } else if p.is_ident("verbal") {
                        Some(FieldKind::Verbal)
                    } else {
                        None
                    };

                    if let Some(kind) = kind {
                        if attr.kind.is_some() {
                            return Err(Error::new(
                                p.span(),
                                "a field is exactly one of switch, option or verbal",
                            ));
                        }
                        attr.kind = Some(kind);
                    } else if p.is_ident("required") {
                        attr.required = true;
                    } else if p.is_ident("exclusive") {
                        attr.exclusive = true;
                    } else {
                        return Err(Error::new(
                            p.span(),
                            "expected switch, option, verbal, required or exclusive",
                        ));
                    }
                }

                Meta::NameValue(nv) => {
                    let key = nv
                        .path
                        .get_ident()
                        .map(ToString::to_string)
                        .unwrap_or_default();
                    match key.as_str() {
                        "solid" => attr.solid = Some(lit_str(&nv.value, "solid")?),
                        "brief" => attr.brief = Some(lit_str(&nv.value, "brief")?),
                        "separator" => attr.separator = Some(lit_char(&nv.value)?),
                        "delimiter" => attr.delimiter = Some(lit_str(&nv.value, "delimiter")?),
                        "depends" => attr.depends.extend(lit_names(&nv.value)?),
                        "dependency" => {
                            let value = lit_str(&nv.value, "dependency")?;
                            attr.dependency = Some(match value.as_str() {
                                "optional" | "Optional" => Dependency::Optional,
                                "required" | "Required" => Dependency::Required,
                                other => {
                                    return Err(Error::new(
                                        nv.value.span(),
                                        format!(
                                            "unknown dependency type: '{}'. Expected optional or required",
                                            other
                                        ),
                                    ))
                                }
                            });
                        }
                        "default" => attr.default = Some(lit_default(&nv.value)?),
                        "converter" => match &nv.value {
                            Expr::Path(path) => attr.converter = Some(path.path.clone()),
                            other => {
                                return Err(Error::new(
                                    other.span(),
                                    "converter must be a type path",
                                ))
                            }
                        },
                        "help" => attr.help = Some(lit_str(&nv.value, "help")?),
                        "value_name" => {
                            attr.value_name = Some(lit_str(&nv.value, "value_name")?)
                        }
                        _ => {
                            return Err(Error::new(
                                nv.path.span(),
                                "unknown attribute. Expected: solid, brief, separator, delimiter, depends, dependency, default, converter, help or value_name",
                            ));
                        }
                    }
                }

                Meta::List(list) => {
                    return Err(Error::new(list.span(), "nested attributes are not supported"));
                }
            }
        }

        Ok(attr)
    }
}

/// Struct-level attributes from `#[args(...)]`.
#[derive(Debug, Clone, Default)]
pub struct ContainerAttr {
    pub program: Option<String>,
    pub about: Option<String>,
    pub footer: Option<String>,
}

impl Parse for ContainerAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = ContainerAttr::default();

        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            let Meta::NameValue(nv) = &meta else {
                return Err(Error::new(
                    meta.span(),
                    "expected program = \"...\", about = \"...\" or footer = \"...\"",
                ));
            };
            if nv.path.is_ident("program") {
                attr.program = Some(lit_str(&nv.value, "program")?);
            } else if nv.path.is_ident("about") {
                attr.about = Some(lit_str(&nv.value, "about")?);
            } else if nv.path.is_ident("footer") {
                attr.footer = Some(lit_str(&nv.value, "footer")?);
            } else {
                return Err(Error::new(
                    nv.path.span(),
                    "unknown attribute. Expected: program, about or footer",
                ));
            }
        }

        Ok(attr)
    }
}

/// Extract `#[args(...)]` from a field's attributes, if present.
pub fn parse_field_attrs(attrs: &[Attribute]) -> Result<Option<FieldAttr>> {
    for attr in attrs {
        if attr.path().is_ident("args") {
            return attr.parse_args::<FieldAttr>().map(Some);
        }
    }
    Ok(None)
}

/// Extract `#[args(...)]` from the struct's attributes.
pub fn parse_container_attrs(attrs: &[Attribute]) -> Result<ContainerAttr> {
    for attr in attrs {
        if attr.path().is_ident("args") {
            return attr.parse_args::<ContainerAttr>();
        }
    }
    Ok(ContainerAttr::default())
}

/// Joins `///` doc comment lines into one help string.
pub fn doc_comment(attrs: &[Attribute]) -> Option<String> {
    let lines: Vec<String> = attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            Meta::NameValue(nv) => match &nv.value {
                Expr::Lit(ExprLit {
                    lit: Lit::Str(s), ..
                }) => Some(s.value().trim().to_string()),
                _ => None,
            },
            _ => None,
        })
        .filter(|line| !line.is_empty())
        .collect();

    (!lines.is_empty()).then(|| lines.join(" "))
}
