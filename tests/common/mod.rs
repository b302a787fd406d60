use forth::mach::{Event, Runtime};

pub fn enter(runtime: &mut Runtime, line: &str) -> String {
    let mut s = String::new();
    for event in runtime.enter(line) {
        match event {
            Event::Print(ps) => {
                s.push_str(&ps);
            }
            Event::Errors(errors) => {
                for error in errors.iter() {
                    s.push_str(&format!("{}\n", error));
                }
            }
            Event::Bye => {}
        }
    }
    s
}
