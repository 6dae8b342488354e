use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use vexpr_checker::{FieldResolver, ResolveLimits, TypePredicates};
use vexpr_core::{Colors, HostTypes, Kind, TypeId, TypeRegistry};

pub struct ResolveArgs {
    pub types_path: PathBuf,
    pub type_name: String,
    pub member_path: String,
    pub max_depth: u32,
    pub color: bool,
}

pub fn run(args: ResolveArgs) {
    let registry = match load_registry(&args.types_path) {
        Ok(registry) => registry,
        Err(msg) => {
            eprintln!("error: {}", msg);
            std::process::exit(1);
        }
    };

    let limits = ResolveLimits::new().max_embedding_depth(args.max_depth);
    let resolved = match resolve(&registry, &args.type_name, &args.member_path, limits) {
        Ok(resolved) => resolved,
        Err(msg) => {
            eprintln!("error: {}", msg);
            std::process::exit(1);
        }
    };

    let Some(ty) = resolved else {
        eprintln!(
            "error: '{}' does not resolve on {}",
            args.member_path, args.type_name
        );
        std::process::exit(1);
    };
    print!("{}", describe(&registry, ty, Colors::new(args.color)));
}

fn load_registry(path: &std::path::Path) -> Result<TypeRegistry, String> {
    let json = fs::read_to_string(path)
        .map_err(|e| format!("failed to read '{}': {}", path.display(), e))?;
    let registry = TypeRegistry::from_json(&json)
        .map_err(|e| format!("invalid type document '{}': {}", path.display(), e))?;
    tracing::debug!(types = registry.type_count(), "type registry loaded");
    Ok(registry)
}

/// Static type of `path` on the type named `type_name`.
///
/// `Ok(None)` when the path does not resolve; the name must exist.
pub fn resolve(
    registry: &TypeRegistry,
    type_name: &str,
    path: &str,
    limits: ResolveLimits,
) -> Result<Option<TypeId>, String> {
    let root = registry
        .lookup(type_name)
        .ok_or_else(|| format!("unknown type '{}'", type_name))?;
    let resolver = FieldResolver::new(registry).with_limits(limits);
    Ok(resolver.fetch_path(Some(root), path))
}

/// Every predicate that holds, in a fixed order.
pub fn classify<H: HostTypes + ?Sized>(host: &H, ty: Option<TypeId>) -> Vec<&'static str> {
    let checks: [(&'static str, fn(&H, Option<TypeId>) -> bool); 12] = [
        ("interface", H::is_interface),
        ("integer", H::is_integer),
        ("float", H::is_float),
        ("number", H::is_number),
        ("time", H::is_time),
        ("duration", H::is_duration),
        ("bool", H::is_bool),
        ("string", H::is_string),
        ("array", H::is_array),
        ("map", H::is_map),
        ("struct", H::is_struct),
        ("func", H::is_func),
    ];
    checks
        .into_iter()
        .filter(|(_, check)| check(host, ty))
        .map(|(name, _)| name)
        .collect()
}

/// Multi-line description of a resolved type.
pub fn describe<H: HostTypes + ?Sized>(host: &H, ty: TypeId, c: Colors) -> String {
    let mut out = String::new();
    writeln!(out, "{}type:{} {}{}{}", c.dim, c.reset, c.green, host.name(ty), c.reset).unwrap();
    writeln!(out, "{}kind:{} {}", c.dim, c.reset, host.kind(ty).name()).unwrap();

    let target = host.dereference(Some(ty));
    if let Some(target) = target
        && target != ty
    {
        writeln!(
            out,
            "{}dereferenced:{} {}{}{} ({})",
            c.dim,
            c.reset,
            c.green,
            host.name(target),
            c.reset,
            host.kind(target).name()
        )
        .unwrap();
    }

    let classes = classify(host, Some(ty));
    let classes = if classes.is_empty() {
        "none".to_string()
    } else {
        classes.join(", ")
    };
    writeln!(out, "{}classes:{} {}", c.dim, c.reset, classes).unwrap();

    if let Some(target) = target
        && host.kind(target) == Kind::Struct
    {
        let members: Vec<String> = host
            .fields(target)
            .map(|f| {
                if f.embedded {
                    format!("{} (embedded)", f.name)
                } else {
                    f.effective_name().to_string()
                }
            })
            .collect();
        writeln!(out, "{}members:{} {}", c.dim, c.reset, members.join(", ")).unwrap();
    }
    out
}
