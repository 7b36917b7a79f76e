use minorm::DatabaseModel;

#[derive(DatabaseModel, Debug)]
#[minorm(primary_key = id, table = "student")]
pub struct Model {
    pub id: i64,
    #[minorm(max_length = 20)]
    pub name: String,
    pub age: Option<i64>,
}
