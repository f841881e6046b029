table! {
    items (id) {
        id -> Int4,
        name -> Varchar,
        created_by -> Varchar,
        owner_email -> Varchar,
        created_at -> Timestamptz,
        quantity -> Nullable<Float8>,
        price -> Nullable<Float8>,
        total -> Nullable<Float8>,
        notes -> Nullable<Text>,
        category -> Nullable<Varchar>,
        custom_fields -> Nullable<Jsonb>,
    }
}

table! {
    users (id) {
        id -> Int4,
        name -> Varchar,
        email -> Varchar,
        password_hash -> Nullable<Varchar>,
        role -> Varchar,
    }
}

allow_tables_to_appear_in_same_query!(items, users,);
