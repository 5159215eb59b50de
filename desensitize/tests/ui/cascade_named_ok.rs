use desensitize::{Cascade, Desensitizer, Email, PhoneNumber};

#[derive(Clone, Debug, Cascade)]
struct Person {
    #[sensitive(PhoneNumber)]
    phone_number: String,
    #[sensitive(Email, "Audit")]
    email: String,
    #[shape("List<@Email String>")]
    aliases: Vec<String>,
    age: u32,
}

#[derive(Clone, Debug, Cascade)]
#[cascade(name = "app.Team")]
struct Team {
    lead: Person,
    #[cascade]
    members: Vec<Person>,
}

fn main() {
    let engine = Desensitizer::builder()
        .cascade::<Person>()
        .cascade::<Team>()
        .build()
        .unwrap();
    let shape = engine.describe::<Team>().unwrap();
    assert_eq!(shape.to_string(), "@Cascade app.Team");
}
