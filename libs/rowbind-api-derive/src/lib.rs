use proc_macro::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{parse_macro_input, parse_quote, Data, DeriveInput, Fields, LitStr};

/// Derive macro generating an `Introspect` implementation.
///
/// Struct attributes:
///
/// - `#[introspect(constructor)]`: all-fields constructor. Parameters follow
///   field declaration order and carry the field names.
/// - `#[introspect(default)]`: no-arg constructor through `Default`.
///
/// Field attributes:
///
/// - `#[introspect(column = "...")]`: column name used when writing records.
/// - `#[introspect(read_only)]` / `#[introspect(write_only)]`: no setter / no getter.
/// - `#[introspect(skip)]`: not a member, filled with `Default::default()` by
///   the generated constructor.
///
/// # Example
///
/// ```ignore
/// #[derive(Introspect, Default)]
/// #[introspect(constructor, default)]
/// pub struct User {
///     pub id: i32,
///     #[introspect(column = "user_name")]
///     pub name: String,
/// }
/// ```
///
/// Field types must implement `ValueType`, `FromValue`, `IntoValue` and `Clone`.
/// Type parameters get `'static + Send` bounds; lifetime parameters are rejected.
#[proc_macro_derive(Introspect, attributes(introspect))]
pub fn derive_introspect(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match derive_impl(&input) {
        Ok(tokens) => tokens,
        Err(e) => e.to_compile_error().into(),
    }
}

#[derive(Default)]
struct FieldAttrs {
    column: Option<String>,
    skip: bool,
    read_only: bool,
    write_only: bool,
}

fn derive_impl(input: &DeriveInput) -> Result<TokenStream, syn::Error> {
    let name = &input.ident;
    let name_str = name.unraw().to_string();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    name,
                    "Introspect only supports structs with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "Introspect only supports structs",
            ))
        }
    };

    // Parse #[introspect(...)] on the struct.
    let mut with_constructor = false;
    let mut with_default = false;
    for attr in &input.attrs {
        if !attr.path().is_ident("introspect") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("constructor") {
                with_constructor = true;
            } else if meta.path.is_ident("default") {
                with_default = true;
            } else {
                return Err(meta.error("expected `constructor` or `default`"));
            }
            Ok(())
        })?;
    }

    let mut param_tokens = Vec::new();
    let mut arg_tokens = Vec::new();
    let mut field_tokens = Vec::new();

    for field in fields {
        let field_name = field.ident.as_ref().ok_or_else(|| {
            syn::Error::new_spanned(field, "expected named field")
        })?;
        // `r#type` is the member `type`
        let field_name_str = field_name.unraw().to_string();
        let field_ty = &field.ty;

        // Parse #[introspect(...)] on the field.
        let mut attrs = FieldAttrs::default();
        for attr in &field.attrs {
            if !attr.path().is_ident("introspect") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("column") {
                    let value: LitStr = meta.value()?.parse()?;
                    attrs.column = Some(value.value());
                } else if meta.path.is_ident("skip") {
                    attrs.skip = true;
                } else if meta.path.is_ident("read_only") {
                    attrs.read_only = true;
                } else if meta.path.is_ident("write_only") {
                    attrs.write_only = true;
                } else {
                    return Err(meta.error(
                        "expected `column = \"...\"`, `skip`, `read_only` or `write_only`",
                    ));
                }
                Ok(())
            })?;
        }

        if attrs.read_only && attrs.write_only {
            return Err(syn::Error::new_spanned(
                field_name,
                "a field cannot be both read_only and write_only",
            ));
        }

        if attrs.skip {
            arg_tokens.push(quote! {
                #field_name: ::core::default::Default::default()
            });
            continue;
        }

        let position = param_tokens.len();
        param_tokens.push(quote! {
            rowbind_api::descriptor::ParamDescriptor {
                name: #field_name_str.to_string(),
                type_tag: <#field_ty as rowbind_api::value::ValueType>::TYPE_TAG,
                position: #position,
            }
        });
        arg_tokens.push(quote! {
            #field_name: rowbind_api::descriptor::bind_arg::<#field_ty>(__args.next().flatten())?
        });

        let column_expr = attrs.column.map(|column| quote! { .column(#column) });
        let getter_expr = (!attrs.write_only).then(|| {
            quote! {
                .getter(|__object: &Self| {
                    Ok(rowbind_api::value::IntoValue::into_value(
                        ::core::clone::Clone::clone(&__object.#field_name),
                    ))
                })
            }
        });
        let setter_expr = (!attrs.read_only).then(|| {
            quote! {
                .setter(|__object: &mut Self, __value: rowbind_api::value::Value| {
                    __object.#field_name =
                        <#field_ty as rowbind_api::value::FromValue>::from_value(__value)?;
                    Ok(())
                })
            }
        });

        field_tokens.push(quote! {
            .with_field(
                rowbind_api::descriptor::FieldDescriptor::new(
                    #field_name_str,
                    <#field_ty as rowbind_api::value::ValueType>::TYPE_TAG,
                )
                #column_expr
                #getter_expr
                #setter_expr
            )
        });
    }

    let constructor_expr = with_constructor.then(|| {
        quote! {
            .with_constructor(rowbind_api::descriptor::Constructor::new(
                vec![#(#param_tokens),*],
                |__args: Vec<Option<rowbind_api::value::Value>>| {
                    let mut __args = __args.into_iter();
                    Ok(Self {
                        #(#arg_tokens),*
                    })
                },
            ))
        }
    });
    let default_expr = with_default.then(|| {
        quote! {
            .with_default(<Self as ::core::default::Default>::default)
        }
    });

    if let Some(lifetime) = input.generics.lifetimes().next() {
        return Err(syn::Error::new_spanned(
            lifetime,
            "Introspect requires 'static types, lifetime parameters are not supported",
        ));
    }

    let mut generics = input.generics.clone();
    {
        let where_clause = generics.make_where_clause();
        for param in input.generics.type_params() {
            let ident = &param.ident;
            where_clause
                .predicates
                .push(parse_quote!(#ident: 'static + ::core::marker::Send));
        }
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics rowbind_api::introspect::Introspect for #name #ty_generics #where_clause {
            fn describe() -> rowbind_api::descriptor::ObjectDescriptor<Self> {
                rowbind_api::descriptor::ObjectDescriptor::object(#name_str)
                    #constructor_expr
                    #default_expr
                    #(#field_tokens)*
            }
        }
    };

    Ok(TokenStream::from(expanded))
}
