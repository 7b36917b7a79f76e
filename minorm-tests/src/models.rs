pub mod student {
    use minorm::DatabaseModel;

    #[derive(DatabaseModel, Debug, Clone, PartialEq, Eq)]
    #[minorm(primary_key = id, table = "student")]
    pub struct Model {
        pub id: i64,
        #[minorm(max_length = 20)]
        pub name: String,
        pub age: Option<i64>,
    }
}

/// Text keys and renamed columns.
pub mod quote {
    use minorm::DatabaseModel;

    #[derive(DatabaseModel, Debug, Clone, PartialEq, Eq)]
    #[minorm(primary_key = slug, table = "quotes")]
    pub struct Model {
        #[minorm(max_length = 40)]
        pub slug: String,
        #[minorm(column = "quote_text", max_length = 200)]
        pub text: String,
        pub year: Option<i32>,
    }
}

/// Table name derived from the struct name.
pub mod counter {
    use minorm::DatabaseModel;

    #[derive(DatabaseModel, Debug)]
    #[minorm(primary_key = id)]
    pub struct CounterRow {
        pub id: i64,
        pub hits: Option<i64>,
    }
}

pub mod bad_table_name {
    use minorm::DatabaseModel;

    #[derive(DatabaseModel, Debug)]
    #[minorm(primary_key = id, table = "1student")]
    pub struct Model {
        pub id: i64,
    }
}
