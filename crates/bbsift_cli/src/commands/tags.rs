//! Tags command implementation

use super::Context;

pub fn run_tags(ctx: &Context) {
    for (name, definition) in ctx.dictionary.iter() {
        let description = definition.description.as_deref().unwrap_or("");
        println!("{:<10} {}", name, description);
    }
    println!();
    println!("{} tags", ctx.dictionary.len());
}
