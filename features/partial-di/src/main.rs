use partial_di::{Arguments, Parameter, PartialRegistry, ServiceBlueprint, ServiceDescriptor, Value};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .init();

    let registry = PartialRegistry::builder()
        .add_partial(
            ServiceBlueprint::new("visit_counter")
                .descriptor(VisitCounter::descriptor())
                .defer("page")
                .argument(1, "/".to_string())
                .call("visit", vec![Value::new(2_u32)]),
        )
        .build()
        .unwrap();

    println!("{:?}", registry);

    let counter = registry
        .invoke::<VisitCounter>(
            "visit_counter",
            Arguments::new().with("page", "/about".to_string()),
        )
        .unwrap();
    println!("{:?}", counter)
}

#[derive(Debug)]
struct VisitCounter {
    page: String,
    root: String,
    visits: u32,
}
impl VisitCounter {
    fn descriptor() -> ServiceDescriptor<VisitCounter> {
        ServiceDescriptor::new(|args| {
            Ok(VisitCounter {
                page: args.required(0)?,
                root: args.required(1)?,
                visits: 0,
            })
        })
        .parameter(Parameter::new("page"))
        .parameter(Parameter::new("root"))
        .method("visit", 1, |counter: &mut VisitCounter, args| {
            counter.visits += args.get::<u32>(0)?;
            Ok(())
        })
    }
}
