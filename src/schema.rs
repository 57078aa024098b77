// @generated by hand, following the teacher's diesel::table! conventions.

diesel::table! {
    documents (id) {
        id -> Integer,
        title -> Text,
        country -> Text,
        state -> Text,
        description -> Nullable<Text>,
        document_language -> Text,
        ocr_text_original -> Nullable<Text>,
        ocr_text_english -> Nullable<Text>,
        file_path -> Text,
        file_url -> Text,
        original_filename -> Text,
        file_size -> BigInt,
        content_type -> Text,
        ocr_text -> Nullable<Text>,
        generated_tags -> Text,
        search_text -> Nullable<Text>,
        embedding -> Nullable<Binary>,
        ai_summary -> Nullable<Text>,
        status -> Text,
        created_at -> Text,
        updated_at -> Text,
        processed_at -> Nullable<Text>,
        approved_at -> Nullable<Text>,
        rejected_at -> Nullable<Text>,
        approved_by -> Nullable<Text>,
        rejected_by -> Nullable<Text>,
        rejection_reason -> Nullable<Text>,
        view_count -> Integer,
        hidden_from_top -> Bool,
    }
}

diesel::table! {
    document_chunks (id) {
        id -> Integer,
        document_id -> Integer,
        chunk_index -> Integer,
        content -> Text,
        document_title -> Text,
        document_country -> Text,
        embedding -> Binary,
        created_at -> Text,
    }
}

diesel::table! {
    jobs (id) {
        id -> Integer,
        document_id -> Integer,
        job_type -> Text,
        status -> Text,
        priority -> Integer,
        current_step -> Nullable<Text>,
        progress_percent -> Integer,
        error_message -> Nullable<Text>,
        retry_count -> Integer,
        max_retries -> Integer,
        created_at -> Text,
        started_at -> Nullable<Text>,
        completed_at -> Nullable<Text>,
        failed_at -> Nullable<Text>,
    }
}

diesel::table! {
    comments (id) {
        id -> Integer,
        document_id -> Integer,
        parent_comment_id -> Nullable<Integer>,
        comment_text -> Text,
        session_hash -> Text,
        status -> Text,
        flag_count -> Integer,
        created_at -> Text,
        updated_at -> Text,
    }
}

diesel::table! {
    annotations (id) {
        id -> Integer,
        document_id -> Integer,
        page_number -> Integer,
        x -> Double,
        y -> Double,
        width -> Double,
        height -> Double,
        highlighted_text -> Nullable<Text>,
        annotation_note -> Nullable<Text>,
        session_hash -> Text,
        created_at -> Text,
    }
}

diesel::table! {
    banned_words (id) {
        id -> Integer,
        word -> Text,
        reason -> Nullable<Text>,
        banned_by -> Text,
        banned_at -> Text,
    }
}

diesel::table! {
    rag_queries (id) {
        id -> Integer,
        query_text -> Text,
        answer_text -> Nullable<Text>,
        confidence_score -> Nullable<Float>,
        sources_count -> Nullable<Integer>,
        response_time_ms -> Nullable<Integer>,
        document_scope -> Nullable<Integer>,
        created_at -> Text,
    }
}

diesel::table! {
    view_events (id) {
        id -> Integer,
        document_id -> Integer,
        session_hash -> Text,
        viewed_at -> Text,
    }
}

diesel::joinable!(comments -> documents (document_id));
diesel::joinable!(annotations -> documents (document_id));
diesel::joinable!(document_chunks -> documents (document_id));
diesel::joinable!(jobs -> documents (document_id));
diesel::joinable!(view_events -> documents (document_id));

diesel::allow_tables_to_appear_in_same_query!(
    documents,
    document_chunks,
    jobs,
    comments,
    annotations,
    banned_words,
    rag_queries,
    view_events,
);
