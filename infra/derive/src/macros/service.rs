use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Fields, ItemStruct};

pub fn expand(input: ItemStruct) -> TokenStream {
    if matches!(input.fields, Fields::Unnamed(_)) {
        return syn::Error::new_spanned(
            &input.ident,
            "shell_service requires a struct with named fields or no fields",
        )
        .to_compile_error();
    }

    let handle = &input.ident;
    let vis = &input.vis;
    let attrs = &input.attrs;
    let inner = format_ident!("{handle}Inner");
    let fields = match &input.fields {
        Fields::Named(named) => quote! { #named },
        _ => quote! { {} },
    };

    quote! {
        #(#attrs)*
        #[derive(Debug)]
        #vis struct #inner #fields

        #[derive(Debug, Clone)]
        #vis struct #handle {
            inner: ::std::sync::Arc<#inner>,
        }

        impl #handle {
            #[must_use]
            pub fn new(inner: #inner) -> Self {
                Self { inner: ::std::sync::Arc::new(inner) }
            }
        }

        impl ::std::ops::Deref for #handle {
            type Target = #inner;

            fn deref(&self) -> &Self::Target {
                &self.inner
            }
        }

        impl ::canopy_kernel::scope::ScopedService for #handle {}
    }
}
